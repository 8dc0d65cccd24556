//! Splunk REST search client.
//!
//! This crate authenticates against the Splunk management API, runs
//! searches, and decodes their results either fully buffered (oneshot
//! searches) or incrementally (export searches), so arbitrarily large
//! exports can be consumed row by row.

mod auth;
pub mod client;
pub mod error;
pub mod metrics;
pub mod namespace;
pub mod options;
pub mod params;
pub mod results;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{AuthStrategy, SessionManager};
pub use client::SplunkClient;
pub use client::builder::SplunkClientBuilder;
pub use error::{ApiError, ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use namespace::Namespace;
pub use options::SearchOptions;
pub use params::Params;
pub use reqwest::Method;
pub use results::{
    ByteStream, Drained, ExportJob, ExportState, Field, FieldValue, Message, MessageType, Row,
    SearchHeader, SearchResults,
};
