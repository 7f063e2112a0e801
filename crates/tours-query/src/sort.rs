use std::fmt;

use bson::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Render a sort list as a Mongo-style `{ field: 1 | -1 }` document.
    pub fn to_document(sorts: &[Sort]) -> Document {
        let mut doc = Document::new();
        for sort in sorts {
            let dir = match sort.direction {
                SortDirection::Asc => 1_i32,
                SortDirection::Desc => -1_i32,
            };
            doc.insert(sort.field.as_str(), dir);
        }
        doc
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => f.write_str(&self.field),
            SortDirection::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// Parse `-price,name` into `[price desc, name asc]`.
///
/// Blank entries are skipped, so `sort=,` parses to an empty list.
pub fn parse_sort(spec: &str) -> Vec<Sort> {
    spec.split(',')
        .map(str::trim)
        .filter_map(|entry| match entry.strip_prefix('-') {
            Some(field) if !field.trim().is_empty() => Some(Sort::desc(field.trim())),
            Some(_) => None,
            None if entry.is_empty() => None,
            None => Some(Sort::asc(entry.strip_prefix('+').unwrap_or(entry))),
        })
        .collect()
}
