//! Optional search parameters.
//!
//! `SearchOptions` accumulates the optional knobs of a search request (time
//! bounds, timeout, result count, required fields, arbitrary pairs). The
//! empty set is valid and adds nothing to the request.
//!
//! The search operations set `search`, `exec_mode` and `output_mode`
//! themselves; those always win over same-named options.

use std::time::Duration;

use crate::params::Params;

/// Builder for optional search parameters.
///
/// # Example
///
/// ```rust,ignore
/// let options = SearchOptions::new()
///     .earliest("-15m")
///     .latest("now")
///     .count(100)
///     .required_field("host");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    params: Params,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest event time (`earliest_time`), e.g. `-24h` or an ISO timestamp.
    pub fn earliest(self, time: impl Into<String>) -> Self {
        self.set("earliest_time", time)
    }

    /// Latest event time (`latest_time`).
    pub fn latest(self, time: impl Into<String>) -> Self {
        self.set("latest_time", time)
    }

    /// Earliest index time (`index_earliest`).
    pub fn index_earliest(self, time: impl Into<String>) -> Self {
        self.set("index_earliest", time)
    }

    /// Latest index time (`index_latest`).
    pub fn index_latest(self, time: impl Into<String>) -> Self {
        self.set("index_latest", time)
    }

    /// Server-side job timeout, in whole seconds.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.set("timeout", timeout.as_secs().to_string())
    }

    /// Maximum number of results to return.
    pub fn count(self, count: u64) -> Self {
        self.set("count", count.to_string())
    }

    /// Require a field to be present in the results. May be repeated.
    pub fn required_field(self, field: impl Into<String>) -> Self {
        self.add("rf", field)
    }

    /// Append an arbitrary parameter value.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.add(key, value);
        self
    }

    /// Set an arbitrary parameter, replacing earlier values.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(key, value);
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
