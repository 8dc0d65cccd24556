//! Connection configuration types.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeout).
//! - Define the main `Config` structure combining connection and auth.
//! - Provide convenience constructors for common config patterns.
//!
//! Does NOT handle:
//! - Configuration loading from env/`.env` (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - Duration fields are serialized as whole seconds.

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::types::auth::{AuthConfig, AuthStrategy};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Connection configuration for a Splunk server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the Splunk management port (e.g., https://localhost:8089)
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Connect and read timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
}

impl ConnectionConfig {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    /// Local development defaults: `https://localhost:8089`, no credentials.
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::new(DEFAULT_BASE_URL.to_string()),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Create a new config with the specified base URL and API token.
    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: Some(AuthStrategy::ApiToken { token }),
            },
        }
    }

    /// Create a new config with the specified base URL and username/password.
    pub fn with_session_token(base_url: String, username: String, password: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: Some(AuthStrategy::SessionToken { username, password }),
            },
        }
    }
}
