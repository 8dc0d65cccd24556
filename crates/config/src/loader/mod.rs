//! Configuration loader for builder calls, environment variables and `.env` files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files and environment variables.
//! - Provide a builder-pattern `ConfigLoader` for layered configuration.
//! - Enforce the `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Invariants / Assumptions:
//! - Builder calls made after `from_env()` override environment values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
