//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration.
//! - Build and validate the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - An API token takes precedence over username/password.
//! - Missing credentials are allowed; a username without a password (or the
//!   reverse) is not.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::types::{AuthConfig, AuthStrategy, Config, ConnectionConfig};

/// Configuration loader that builds config from environment variables and builder calls.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            tracing::debug!("DOTENV_DISABLED set, skipping .env loading");
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from `SPLUNK_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(validate_and_normalize_base_url)
            .transpose()?
            .ok_or(ConfigError::MissingBaseUrl)?;

        let strategy = match (self.api_token, self.username, self.password) {
            (Some(token), _, _) => Some(AuthStrategy::ApiToken { token }),
            (None, Some(username), Some(password)) => {
                Some(AuthStrategy::SessionToken { username, password })
            }
            (None, None, None) => None,
            (None, _, _) => return Err(ConfigError::IncompleteCredentials),
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        };

        Self::validate_timeout(connection.timeout)?;

        tracing::debug!(
            base_url = %connection.base_url,
            has_credentials = strategy.is_some(),
            "Built configuration"
        );

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
        })
    }

    /// Timeout must be within `1..=MAX_TIMEOUT_SECS` seconds.
    fn validate_timeout(timeout: Duration) -> Result<(), ConfigError> {
        let timeout_secs = timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }

        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        Ok(())
    }

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

/// Validates and normalizes a base URL string.
///
/// Validation rules:
/// - Trim surrounding whitespace
/// - Treat blank/whitespace-only as missing (returns Err(ConfigError::MissingBaseUrl))
/// - Parse as an absolute URL
/// - Require scheme is http or https
/// - Require host is present
/// - Normalize by stripping trailing slash
fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "base_url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://localhost:8089): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: format!(
                "scheme must be http or https (e.g. https://localhost:8089), got: {scheme}"
            ),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: "host is required (e.g. https://localhost:8089)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
