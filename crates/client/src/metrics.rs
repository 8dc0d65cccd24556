//! Metrics collection for REST calls and export streams.
//!
//! This module provides metrics collection for Splunk API calls, including:
//! - Request latency histograms
//! - Request and error counters
//! - Rows produced by export jobs
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a recorder in the embedding application)
//!
//! # Invariants
//! - All metrics use consistent label names: `endpoint`, `method`, `status`, `error_category`
//! - Metric recording is infallible
//! - A disabled collector records nothing

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "splunk_search_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "splunk_search_requests_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "splunk_search_errors_total";

/// Metric name for rows decoded from export streams.
pub const METRIC_EXPORT_ROWS_TOTAL: &str = "splunk_search_export_rows_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection-level errors (refused, DNS, TLS, timeout)
    Transport,
    /// HTTP 4xx client errors
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// In-band FATAL messages on a 200 response
    SearchFatal,
    /// Malformed envelope, record length or value decode errors
    Protocol,
    /// Missing or unusable credentials
    Auth,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::SearchFatal => "search_fatal",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::ConnectionFailed { .. } | ClientError::HttpError(_) => {
                ErrorCategory::Transport
            }
            ClientError::Api(api) => match api.status {
                400..=499 => ErrorCategory::Http4xx,
                500..=599 => ErrorCategory::Http5xx,
                _ => ErrorCategory::Unknown,
            },
            ClientError::SearchFatal(_) => ErrorCategory::SearchFatal,
            ClientError::MalformedResponse { .. }
            | ClientError::RecordLength { .. }
            | ClientError::InvalidValue(_)
            | ClientError::InvalidResponse(_) => ErrorCategory::Protocol,
            ClientError::AuthNotConfigured | ClientError::MissingSessionKey => ErrorCategory::Auth,
            ClientError::InvalidUrl(_) => ErrorCategory::Unknown,
        }
    }
}

/// Metrics collector for Splunk API calls.
///
/// A thin wrapper around the `metrics` crate macros that keeps label names
/// consistent.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of an API request.
    ///
    /// `status` is `None` when no response was received.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    pub fn record_error(&self, endpoint: &str, method: &str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record an error, categorizing it automatically.
    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        self.record_error(endpoint, method, ErrorCategory::from(error));
    }

    /// Record rows produced by an export job.
    pub fn record_export_rows(&self, rows: u64) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_EXPORT_ROWS_TOTAL).increment(rows);
    }
}
