//! Error types for the Splunk search client.
//!
//! # What this module handles:
//! - The single [`ClientError`] enum returned by every fallible operation
//! - [`ApiError`], the decoded body of an HTTP response with status >= 400
//!
//! # Invariants
//! - `ClientError` is `Clone` so an export job can return its terminal error
//!   and keep a copy for [`crate::ExportJob::last_error`]
//! - Rendered errors never contain credentials or session keys

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::results::Message;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Body of a failed REST call: the HTTP status plus any messages the server sent.
///
/// Renders as the message texts joined by `"; "`, followed by
/// `StatusCode <n>` when the status is nonzero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ApiError {
    /// Create an API error with no server messages.
    pub fn from_status(status: u16) -> Self {
        Self {
            status,
            messages: Vec::new(),
        }
    }

    /// Decode an error body, keeping the status even if the body is unusable.
    pub(crate) fn from_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiError>(body) {
            Ok(mut err) => {
                err.status = status;
                err
            }
            Err(e) => {
                tracing::debug!(status, error = %e, "Error body was not a message list");
                Self::from_status(status)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.messages.iter().map(|m| m.text.clone()).collect();
        if self.status != 0 {
            parts.push(format!("StatusCode {}", self.status));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ApiError {}

/// Errors that can occur during Splunk client operations.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// `authenticate` was called with no credentials configured.
    #[error("No credentials configured: set a username/password or an API token")]
    AuthNotConfigured,

    /// Invalid base URL or request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent (connection refused, DNS, TLS, timeout).
    #[error("Connection to {url} failed: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// Transport error after the response started (e.g. reading the body).
    #[error("HTTP error: {0}")]
    HttpError(Arc<reqwest::Error>),

    /// HTTP status >= 400.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A `FATAL` message arrived in-band on a 200 response.
    #[error("Search failed: {0}")]
    SearchFatal(String),

    /// An expected JSON token did not appear.
    #[error("Malformed response: expected {expected}, found {found}")]
    MalformedResponse { expected: String, found: String },

    /// A row had a different number of values than the header has fields.
    #[error("Record length mismatch: row has {found} values, header has {expected} fields")]
    RecordLength { found: usize, expected: usize },

    /// A field value was neither a string nor a list of strings.
    #[error("Cannot decode field value: {0}")]
    InvalidValue(String),

    /// Response body could not be decoded.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The login response had no `sessionKey`.
    #[error("Login response did not contain a sessionKey")]
    MissingSessionKey,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(Arc::new(err))
    }
}

impl ClientError {
    /// Wrap a send failure together with the URL it was sent to.
    pub(crate) fn connection(url: &str, err: reqwest::Error) -> Self {
        Self::ConnectionFailed {
            url: url.to_string(),
            source: Arc::new(err),
        }
    }

    /// Shorthand for a malformed-envelope error.
    pub(crate) fn malformed(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::MalformedResponse {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            _ => None,
        }
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AuthNotConfigured | Self::MissingSessionKey
        ) || matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::MessageType;

    fn message(message_type: MessageType, text: &str) -> Message {
        Message {
            message_type,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_api_error_renders_messages_and_status() {
        let err = ApiError {
            status: 400,
            messages: vec![
                message(MessageType::Error, "first"),
                message(MessageType::Warn, "second"),
            ],
        };
        assert_eq!(err.to_string(), "first; second; StatusCode 400");
    }

    #[test]
    fn test_api_error_without_messages() {
        assert_eq!(ApiError::from_status(503).to_string(), "StatusCode 503");
    }

    #[test]
    fn test_api_error_zero_status_omitted() {
        let err = ApiError {
            status: 0,
            messages: vec![message(MessageType::Error, "only text")],
        };
        assert_eq!(err.to_string(), "only text");
    }

    #[test]
    fn test_api_error_from_body() {
        let body = br#"{"messages":[{"type":"ERROR","text":"Unknown sid."}]}"#;
        let err = ApiError::from_body(404, body);
        assert_eq!(err.status, 404);
        assert_eq!(err.messages.len(), 1);
        assert_eq!(err.messages[0].message_type, MessageType::Error);
    }

    #[test]
    fn test_api_error_from_unparseable_body_keeps_status() {
        let err = ApiError::from_body(500, b"<html>Internal Server Error</html>");
        assert_eq!(err.status, 500);
        assert!(err.messages.is_empty());
    }

    #[test]
    fn test_error_is_auth_error() {
        assert!(ClientError::AuthNotConfigured.is_auth_error());
        assert!(ClientError::Api(ApiError::from_status(401)).is_auth_error());
        assert!(!ClientError::Api(ApiError::from_status(404)).is_auth_error());
        assert!(!ClientError::SearchFatal("x".into()).is_auth_error());
    }

    #[test]
    fn test_record_length_display_names_both_lengths() {
        let err = ClientError::RecordLength {
            found: 1,
            expected: 3,
        };
        let text = err.to_string();
        assert!(text.contains('1'));
        assert!(text.contains('3'));
    }
}
