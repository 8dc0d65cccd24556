//! Credential configuration, login and logout.
//!
//! # What this module does NOT handle:
//! - Credential and session-key storage (handled by [`SessionManager`](crate::auth::SessionManager))
//!
//! # Invariants
//! - `set_credentials` and `set_token` replace each other and clear the session key
//! - A failed `authenticate` leaves any previously held session key untouched
//! - `deauthenticate` always clears the local session key; the server-side
//!   invalidation is best-effort

use std::collections::HashMap;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::auth::AuthStrategy;
use crate::client::{OutputMode, SplunkClient};
use crate::error::{ClientError, Result};
use crate::namespace::{Namespace, encode_path_segment};
use crate::params::Params;
use crate::results::TokenReader;

const LOGIN_PATH: &str = "auth/login";
const HTTPAUTH_TOKENS_PATH: &str = "authentication/httpauth-tokens";

impl SplunkClient {
    /// Use username/password login. Replaces any token and clears the session key.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: SecretString) {
        self.session.set_strategy(AuthStrategy::SessionToken {
            username: username.into(),
            password,
        });
    }

    /// Use bearer-token login. Replaces any username/password and clears the session key.
    pub fn set_token(&mut self, token: SecretString) {
        self.session.set_strategy(AuthStrategy::ApiToken { token });
    }

    /// Check if the client is using API token authentication.
    pub fn is_api_token_auth(&self) -> bool {
        self.session.is_api_token()
    }

    /// Whether a session key is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.session.has_session_key()
    }

    /// Log in with the configured credential and store the session key.
    ///
    /// # Errors
    ///
    /// - [`ClientError::AuthNotConfigured`] if no credential is set
    /// - [`ClientError::Api`] if the server rejects the login
    /// - [`ClientError::InvalidResponse`] if the body is not a flat string map
    /// - [`ClientError::MissingSessionKey`] if the map has no `sessionKey`
    pub async fn authenticate(&mut self) -> Result<()> {
        let mut params = Params::new();
        let authorization = match self.session.strategy() {
            Some(AuthStrategy::SessionToken { username, password }) => {
                debug!("Logging in to Splunk as {}", username);
                params
                    .set("username", username.as_str())
                    .set("password", password.expose_secret());
                None
            }
            Some(AuthStrategy::ApiToken { token }) => {
                debug!("Logging in to Splunk with API token");
                Some(format!("Bearer {}", token.expose_secret()))
            }
            None => return Err(ClientError::AuthNotConfigured),
        };

        let stream = self
            .send_with_auth(
                Method::POST,
                &Namespace::global(),
                LOGIN_PATH,
                params,
                OutputMode::Json,
                authorization,
            )
            .await?;

        let mut reader = TokenReader::new(stream);
        let mut info: HashMap<String, String> =
            reader.decode("login response").await.map_err(|_| {
                ClientError::InvalidResponse(
                    "login response is not a map of strings".to_string(),
                )
            })?;
        drop(reader);

        let key = info
            .remove("sessionKey")
            .ok_or(ClientError::MissingSessionKey)?;
        self.session.set_session_key(key);
        debug!("Authenticated; session key stored");
        Ok(())
    }

    /// Discard the session key, asking the server to invalidate it first.
    ///
    /// The server call never fails this method; problems are logged at `warn`.
    pub async fn deauthenticate(&mut self) {
        let Some(key) = self.session.take_session_key() else {
            debug!("Deauthenticate called without a session key");
            return;
        };

        let path = format!(
            "{}/{}",
            HTTPAUTH_TOKENS_PATH,
            encode_path_segment(key.expose_secret())
        );
        // The URL embeds the session key, so it is never logged.
        let result = self
            .http
            .delete(self.endpoint_url(&Namespace::global(), &path))
            .header(AUTHORIZATION, format!("Splunk {}", key.expose_secret()))
            .query(&[("output_mode", "json")])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Session invalidated on server");
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    "Server refused session invalidation; session key discarded locally"
                );
            }
            Err(e) => {
                warn!(
                    error = %e.without_url(),
                    "Session invalidation request failed; session key discarded locally"
                );
            }
        }
    }
}
