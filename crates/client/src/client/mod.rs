//! Main Splunk REST client.
//!
//! This module provides the primary [`SplunkClient`]: connection settings,
//! the credential and session key, and the HTTP request layer the search
//! operations are built on.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: credential configuration, login and logout
//! - `request`: authenticated requests and error mapping
//! - `search`: blocking and export searches
//!
//! # What this module does NOT handle:
//! - Decoding result payloads (delegated to [`crate::results`])
//! - Credential storage (delegated to [`crate::auth::SessionManager`])
//!
//! # Invariants
//! - Operations that change the session (`authenticate`, `deauthenticate`,
//!   `set_credentials`, `set_token`) take `&mut self`; requests take `&self`.
//!   Share a client across tasks behind a lock if it must be re-authenticated.
//! - No retries: every failure is returned to the caller as-is

pub mod builder;
mod request;
mod search;
mod session;

use crate::auth::SessionManager;
use crate::metrics::MetricsCollector;

pub(crate) use request::OutputMode;
pub(crate) use search::SEARCH_EXPORT_PATH;

/// Splunk REST API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use splunk_search::{AuthStrategy, Namespace, SearchOptions, SplunkClient};
/// use secrecy::SecretString;
///
/// let mut client = SplunkClient::builder()
///     .base_url("https://localhost:8089".to_string())
///     .auth_strategy(AuthStrategy::SessionToken {
///         username: "admin".to_string(),
///         password: SecretString::new("changeme".to_string().into()),
///     })
///     .build()?;
/// client.authenticate().await?;
///
/// let mut job = client
///     .search_export(&Namespace::global(), "search index=_internal | head 10", SearchOptions::new())
///     .await?;
/// while let Some(row) = job.next().await? {
///     println!("{row:?}");
/// }
/// ```
#[derive(Debug)]
pub struct SplunkClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session: SessionManager,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl SplunkClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SplunkClientBuilder {
        builder::SplunkClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
