use serde::{Deserialize, Serialize};

use crate::sort::{Sort, parse_sort};

/// Defaults the shaper falls back to when a request leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaperConfig {
    pub default_limit: u64,
    pub default_sort: Vec<Sort>,
    /// Fields the schema never returns. A `fields` include cannot name them.
    pub hidden_fields: Vec<String>,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            default_sort: vec![Sort::desc("createdAt"), Sort::asc("_id")],
            hidden_fields: vec!["password".to_string()],
        }
    }
}

impl ShaperConfig {
    /// Read overrides from `TOURS_DEFAULT_LIMIT`, `TOURS_DEFAULT_SORT` and
    /// `TOURS_HIDDEN_FIELDS`. Unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(limit) = lookup("TOURS_DEFAULT_LIMIT")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
        {
            config.default_limit = limit;
        }

        if let Some(sort) = lookup("TOURS_DEFAULT_SORT")
            .map(|s| parse_sort(&s))
            .filter(|s| !s.is_empty())
        {
            config.default_sort = sort;
        }

        if let Some(fields) = lookup("TOURS_HIDDEN_FIELDS") {
            config.hidden_fields = fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }

    /// The default sort with an `_id` tie-break appended when missing, so
    /// equal sort keys still page deterministically.
    pub fn default_sort(&self) -> Vec<Sort> {
        let mut sort = self.default_sort.clone();
        if !sort.iter().any(|s| s.field == "_id") {
            sort.push(Sort::asc("_id"));
        }
        sort
    }
}
