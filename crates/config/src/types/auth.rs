//! Authentication types for client configuration.
//!
//! Responsibilities:
//! - Define authentication strategies (session login, API token).
//! - Handle serialization of secret values.
//!
//! Does NOT handle:
//! - Actual authentication flow or token exchange (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - At most one strategy is active; "no credentials" is `AuthConfig { strategy: None }`.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Strategy for authenticating with Splunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// Username and password, exchanged for a session key at login.
    #[serde(rename = "session")]
    SessionToken {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
    /// Bearer token, presented at login and on requests without a session key.
    #[serde(rename = "token")]
    ApiToken {
        #[serde(with = "secret_string")]
        token: SecretString,
    },
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The authentication strategy to use, if any.
    #[serde(default)]
    pub strategy: Option<AuthStrategy>,
}
