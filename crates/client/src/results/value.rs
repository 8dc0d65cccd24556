//! Field values: a single string or an ordered list of strings.
//!
//! Multi-valued fields arrive as JSON arrays of strings; everything else is
//! a JSON string. `null` (and `null` list elements) decode to the empty
//! string. Any other shape is rejected.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ClientError, Result};

/// The value of one field in one result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

/// One result row: field name to value.
pub type Row = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// All values, treating a single value as a one-element list.
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Single(s) => std::slice::from_ref(s),
            FieldValue::Multi(v) => v,
        }
    }

    /// The value if this is a single-valued field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::Multi(_) => None,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, FieldValue::Multi(_))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::Multi(v)
    }
}

/// Decode one raw JSON value into a [`FieldValue`].
///
/// A value whose first non-whitespace byte is `[` must be a list of strings;
/// anything else must be a string. Failures carry the raw JSON text.
pub fn decode_value(raw: &[u8]) -> Result<FieldValue> {
    let decoded = if raw.trim_ascii_start().first() == Some(&b'[') {
        serde_json::from_slice::<Vec<Option<String>>>(raw).map(|values| {
            FieldValue::Multi(values.into_iter().map(Option::unwrap_or_default).collect())
        })
    } else {
        serde_json::from_slice::<Option<String>>(raw)
            .map(|value| FieldValue::Single(value.unwrap_or_default()))
    };
    decoded.map_err(|_| ClientError::InvalidValue(String::from_utf8_lossy(raw).into_owned()))
}
