use bson::Document;
use serde::{Deserialize, Serialize};

/// Which fields each matched document carries back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "fields")]
pub enum Projection {
    #[default]
    All,
    /// Only these fields, plus `_id`.
    Include(Vec<String>),
    /// Everything except these fields.
    Exclude(Vec<String>),
}

impl Projection {
    /// Parse a `fields` parameter such as `name,price` or `-description`.
    ///
    /// Names in `hidden` can never be included. When the list mixes includes
    /// and `-` excludes, the includes win and the excludes are dropped.
    pub fn parse(spec: &str, hidden: &[String]) -> Self {
        let mut include: Vec<String> = Vec::new();
        let mut exclude: Vec<String> = Vec::new();
        let mut requested_include = false;

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.strip_prefix('-') {
                Some(field) => {
                    let field = field.trim();
                    if !field.is_empty() && !exclude.iter().any(|f| f == field) {
                        exclude.push(field.to_string());
                    }
                }
                None => {
                    requested_include = true;
                    if hidden.iter().any(|h| h == entry) || include.iter().any(|f| f == entry) {
                        continue;
                    }
                    include.push(entry.to_string());
                }
            }
        }

        if requested_include {
            Projection::Include(include)
        } else if exclude.is_empty() {
            Projection::All
        } else {
            Projection::Exclude(exclude)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Projection::All)
    }

    /// Whether top-level `field` survives this projection, whole or in part.
    /// An include of `startLocation.address` keeps `startLocation`; an
    /// exclude of it only trims it. `_id` survives an include list.
    pub fn includes(&self, field: &str) -> bool {
        match self {
            Projection::All => true,
            Projection::Include(fields) => {
                field == "_id" || fields.iter().any(|f| f == field || is_below(f, field))
            }
            Projection::Exclude(fields) => !fields.iter().any(|f| f == field),
        }
    }

    /// Render as a Mongo-style projection document. `All` renders empty.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        match self {
            Projection::All => {}
            Projection::Include(fields) => {
                if fields.is_empty() {
                    doc.insert("_id", 1_i32);
                }
                for field in fields {
                    doc.insert(field.as_str(), 1_i32);
                }
            }
            Projection::Exclude(fields) => {
                for field in fields {
                    doc.insert(field.as_str(), 0_i32);
                }
            }
        }
        doc
    }
}

fn is_below(path: &str, field: &str) -> bool {
    path.strip_prefix(field).is_some_and(|rest| rest.starts_with('.'))
}
