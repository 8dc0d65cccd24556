//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `SPLUNK_*` environment variables.
//! - Apply their values to a `ConfigLoader` instance.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid boolean/numeric values return `ConfigError::InvalidValue`.

use secrecy::SecretString;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("SPLUNK_BASE_URL") {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none("SPLUNK_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("SPLUNK_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none("SPLUNK_API_TOKEN") {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(skip) = env_var_or_none("SPLUNK_SKIP_VERIFY") {
        loader.set_skip_verify(Some(skip.parse().map_err(|_| {
            ConfigError::InvalidValue {
                var: "SPLUNK_SKIP_VERIFY".to_string(),
                message: "must be true or false".to_string(),
            }
        })?));
    }
    if let Some(timeout) = env_var_or_none("SPLUNK_TIMEOUT") {
        let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
            var: "SPLUNK_TIMEOUT".to_string(),
            message: "must be a number".to_string(),
        })?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    Ok(())
}
