//! Client builder for constructing [`SplunkClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating and normalizing the base URL
//! - Configuring the underlying HTTP client (timeouts, TLS verification, redirects)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`SplunkClient`] methods)
//! - Login (credentials are only stored here; call `authenticate()`)
//!
//! # Invariants
//! - `base_url` is required and is stored without trailing slashes
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning
//! - `timeout` bounds connecting and each wait for more response bytes, never
//!   the whole response, so an export that keeps producing rows is not cut off
//! - A caller-supplied `http_client` is used as-is; `timeout` and
//!   `skip_verify` are then ignored

use std::time::Duration;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::SplunkClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use splunk_search_config::{
    Config,
    constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS},
};

/// Builder for creating a new [`SplunkClient`].
///
/// # Example
///
/// ```rust,ignore
/// use splunk_search::{SplunkClient, AuthStrategy};
/// use secrecy::SecretString;
///
/// let client = SplunkClient::builder()
///     .base_url("https://localhost:8089".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("my-token".to_string().into()),
///     })
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct SplunkClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
    metrics: Option<MetricsCollector>,
}

impl Default for SplunkClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http_client: None,
            metrics: None,
        }
    }
}

impl SplunkClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the Splunk management port, e.g. `https://localhost:8089`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the authentication strategy.
    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this in development or testing environments.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the connect timeout and the longest silence allowed between
    /// response reads. A stalled stream fails with `ClientError::HttpError`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured HTTP client instead of building one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the metrics collector for request and export metrics.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    ///
    /// ```rust,ignore
    /// use splunk_search::SplunkClient;
    /// use splunk_search_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().load_dotenv()?.from_env()?.build()?;
    /// let client = SplunkClient::builder().from_config(&config).build()?;
    /// ```
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.auth_strategy = config.auth.strategy.clone();
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self
    }

    /// Remove trailing slashes so endpoint paths join with exactly one `/`.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`SplunkClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is missing or does not parse.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<SplunkClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = match self.http_client {
            Some(client) => client,
            None => {
                let mut http_builder = reqwest::Client::builder()
                    .connect_timeout(self.timeout)
                    .read_timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

                if self.skip_verify {
                    if base_url.starts_with("https://") {
                        http_builder = http_builder.danger_accept_invalid_certs(true);
                    } else {
                        tracing::warn!(
                            "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                        );
                    }
                }
                http_builder.build()?
            }
        };

        Ok(SplunkClient {
            http,
            base_url,
            session: SessionManager::new(self.auth_strategy),
            metrics: self.metrics,
        })
    }
}
