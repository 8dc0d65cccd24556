//! Request parameters: a name to one-or-more values multimap.
//!
//! Serialized as repeated `name=value` form pairs. Ordering between names is
//! not significant; ordering of values under one name is preserved.

use std::collections::BTreeMap;

/// Form parameters sent with a REST request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), vec![value.into()]);
        self
    }

    /// Append `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.entry(key.into()).or_default().push(value.into());
        self
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flatten into form pairs, one per value.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}
