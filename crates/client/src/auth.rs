//! Authentication strategies and session-key storage.
//!
//! # What this module does NOT handle:
//! - The login/logout HTTP calls (see `client/session.rs`)
//!
//! # Invariants
//! - At most one credential mode is active; setting one replaces the other
//! - Changing credentials always clears the held session key
//! - Secrets never appear in `Debug` output

use secrecy::{ExposeSecret, SecretString};

pub use splunk_search_config::AuthStrategy;

/// Holds the configured credential and the session key obtained from it.
#[derive(Debug, Default)]
pub struct SessionManager {
    strategy: Option<AuthStrategy>,
    session_key: Option<SecretString>,
}

impl SessionManager {
    /// Create a session manager for the given credential (or none).
    pub fn new(strategy: Option<AuthStrategy>) -> Self {
        Self {
            strategy,
            session_key: None,
        }
    }

    /// Get the current auth strategy.
    pub fn strategy(&self) -> Option<&AuthStrategy> {
        self.strategy.as_ref()
    }

    /// Replace the credential. Any held session key is dropped.
    pub fn set_strategy(&mut self, strategy: AuthStrategy) {
        self.strategy = Some(strategy);
        self.session_key = None;
    }

    /// Check if we're using API token auth.
    pub fn is_api_token(&self) -> bool {
        matches!(self.strategy, Some(AuthStrategy::ApiToken { .. }))
    }

    /// Store the session key returned by a successful login.
    pub fn set_session_key(&mut self, key: String) {
        self.session_key = Some(SecretString::new(key.into()));
    }

    /// Remove and return the held session key.
    pub fn take_session_key(&mut self) -> Option<SecretString> {
        self.session_key.take()
    }

    pub fn has_session_key(&self) -> bool {
        self.session_key.is_some()
    }

    /// Value of the `Authorization` header for a regular request.
    ///
    /// `Splunk <key>` when a session key is held, otherwise `Bearer <token>`
    /// for API token auth, otherwise nothing.
    pub fn authorization_header(&self) -> Option<String> {
        if let Some(key) = &self.session_key {
            return Some(format!("Splunk {}", key.expose_secret()));
        }
        match &self.strategy {
            Some(AuthStrategy::ApiToken { token }) => {
                Some(format!("Bearer {}", token.expose_secret()))
            }
            _ => None,
        }
    }
}
