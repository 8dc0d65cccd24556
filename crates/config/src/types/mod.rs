//! Configuration types.
//!
//! - `auth`: credential strategies
//! - `connection`: connection settings and the top-level `Config`

mod auth;
mod connection;

pub use auth::{AuthConfig, AuthStrategy};
pub use connection::{Config, ConnectionConfig};
