use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Reserved parameter names that drive shaping and never become filters.
pub const CONTROL_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

pub fn is_control_key(key: &str) -> bool {
    CONTROL_KEYS.contains(&key)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The value used when a scalar is expected. Repeated keys resolve to the
    /// last occurrence.
    pub fn last(&self) -> Option<&str> {
        match self {
            ParamValue::Single(s) => Some(s),
            ParamValue::Many(values) => values.last().map(String::as_str),
        }
    }

    fn push(self, value: String) -> Self {
        match self {
            ParamValue::Single(first) => ParamValue::Many(vec![first, value]),
            ParamValue::Many(mut values) => {
                values.push(value);
                ParamValue::Many(values)
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

/// Request parameters as decoded from a query string.
///
/// Keys are kept verbatim, including any `[op]` suffix. Iteration is ordered
/// by key so two maps with the same entries always shape identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, ParamValue>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `a=1&b[gte]=2` query string. Repeated keys collect into
    /// [`ParamValue::Many`].
    pub fn from_query_string(query: &str) -> Result<Self, ParamsError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs.into_iter().collect())
    }

    /// Set `key`, replacing whatever was there.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Add one more value for `key`, turning it into a list if already set.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let merged = match self.0.remove(&key) {
            Some(existing) => existing.push(value),
            None => ParamValue::Single(value),
        };
        self.0.insert(key, merged);
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Scalar lookup; see [`ParamValue::last`].
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::last)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (key, value) in iter {
            map.append(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bracketed_keys_verbatim() {
        let params = ParameterMap::from_query_string("price%5Bgte%5D=100&difficulty=easy").unwrap();
        assert_eq!(params.get_str("price[gte]"), Some("100"));
        assert_eq!(params.get_str("difficulty"), Some("easy"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn leading_question_mark_is_ignored() {
        let params = ParameterMap::from_query_string("?sort=-price,name").unwrap();
        assert_eq!(params.get_str("sort"), Some("-price,name"));
    }

    #[test]
    fn repeated_keys_collect() {
        let params =
            ParameterMap::from_query_string("difficulty=easy&difficulty=medium").unwrap();
        assert_eq!(
            params.get("difficulty"),
            Some(&ParamValue::Many(vec!["easy".into(), "medium".into()]))
        );
        assert_eq!(params.get_str("difficulty"), Some("medium"));
    }

    #[test]
    fn plus_and_percent_decoding() {
        let params = ParameterMap::from_query_string("name=The+Forest%20Hiker").unwrap();
        assert_eq!(params.get_str("name"), Some("The Forest Hiker"));
    }

    #[test]
    fn empty_query_string() {
        assert!(ParameterMap::from_query_string("").unwrap().is_empty());
    }

    #[test]
    fn insert_replaces_list() {
        let mut params: ParameterMap = [("limit", "1"), ("limit", "2")].into_iter().collect();
        params.insert("limit", "5");
        assert_eq!(params.get("limit"), Some(&ParamValue::Single("5".into())));
    }

    #[test]
    fn control_keys() {
        for key in CONTROL_KEYS {
            assert!(is_control_key(key));
        }
        assert!(!is_control_key("price"));
        assert!(!is_control_key("pages"));
    }
}
