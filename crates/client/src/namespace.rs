//! REST namespaces: the (user, app) scope a resource path lives under.
//!
//! Rendering rules:
//! - No user and no app: `services/`
//! - Otherwise: `servicesNS/<user>/<app>/`, with a missing part written as `-`
//!
//! Segments are percent-encoded so a user or app name can never add path
//! components or a query string to the URL.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};
use splunk_search_config::constants::{
    GLOBAL_NAMESPACE_PREFIX, NAMESPACE_WILDCARD, NAMESPACED_PREFIX,
};

/// Characters that must be percent-encoded in a namespace path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode a string for use as a single URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}

/// A (user, app) scope. Empty strings are treated the same as absent parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    user: Option<String>,
    app: Option<String>,
}

impl Namespace {
    /// The global namespace (`services/`).
    pub fn global() -> Self {
        Self::default()
    }

    pub fn new(user: impl Into<String>, app: impl Into<String>) -> Self {
        Self::default().with_user(user).with_app(app)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = non_empty(user.into());
        self
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = non_empty(app.into());
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn is_global(&self) -> bool {
        self.user.is_none() && self.app.is_none()
    }

    /// Render the path prefix, always ending in `/`.
    pub fn path_prefix(&self) -> String {
        if self.is_global() {
            return GLOBAL_NAMESPACE_PREFIX.to_string();
        }
        let segment = |part: &Option<String>| {
            part.as_deref()
                .map(encode_path_segment)
                .unwrap_or_else(|| NAMESPACE_WILDCARD.to_string())
        };
        format!(
            "{}/{}/{}/",
            NAMESPACED_PREFIX,
            segment(&self.user),
            segment(&self.app)
        )
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_prefix())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
