//! Centralized constants for the Splunk search workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default Splunk management URL used by `Config::default()`.
pub const DEFAULT_BASE_URL: &str = "https://localhost:8089";

/// Default connect and read timeout in seconds.
///
/// Applies to connecting and to each wait for more response bytes, not to a
/// whole response, so long export searches are not cut off.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Maximum allowed connect/read timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Protocol
// =============================================================================

/// Path prefix for resources outside any user/app namespace.
pub const GLOBAL_NAMESPACE_PREFIX: &str = "services/";

/// Path prefix for namespaced resources.
pub const NAMESPACED_PREFIX: &str = "servicesNS";

/// Placeholder for an unset namespace user or app.
pub const NAMESPACE_WILDCARD: &str = "-";
