use std::cmp::Ordering;
use std::future::{Future, ready};
use std::sync::RwLock;

use bson::{Bson, Document};
use tours_query::{Filter, Operator, Predicate, Projection, QueryDescriptor, Sort, SortDirection};

use crate::collection::Queryable;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("collection lock poisoned")]
    Poisoned,
}

/// An in-process collection of documents.
///
/// Query-string values arrive as strings, so comparisons coerce the query
/// side to the stored type (`"100"` against an integer compares as 100).
/// Fields in `hidden` are stripped from every result regardless of the
/// projection, the way a schema-level `select: false` would.
pub struct MemoryCollection {
    docs: RwLock<Vec<Document>>,
    hidden: Vec<String>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            hidden: Vec::new(),
        }
    }

    pub fn with_hidden_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.hidden = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn insert_many(&self, docs: impl IntoIterator<Item = Document>) -> Result<(), MemoryError> {
        let mut guard = self.docs.write().map_err(|_| MemoryError::Poisoned)?;
        guard.extend(docs);
        Ok(())
    }

    pub fn delete_all(&self) -> Result<u64, MemoryError> {
        let mut guard = self.docs.write().map_err(|_| MemoryError::Poisoned)?;
        let n = guard.len() as u64;
        guard.clear();
        Ok(n)
    }

    pub fn len(&self) -> Result<usize, MemoryError> {
        let docs = self.docs.read().map_err(|_| MemoryError::Poisoned)?;
        Ok(docs.len())
    }

    pub fn is_empty(&self) -> Result<bool, MemoryError> {
        Ok(self.len()? == 0)
    }

    fn count_sync(&self, filter: &Predicate) -> Result<u64, MemoryError> {
        let docs = self.docs.read().map_err(|_| MemoryError::Poisoned)?;
        Ok(docs.iter().filter(|d| matches(d, filter)).count() as u64)
    }

    fn find_sync(&self, query: &QueryDescriptor) -> Result<Vec<Document>, MemoryError> {
        let docs = self.docs.read().map_err(|_| MemoryError::Poisoned)?;
        let mut matched: Vec<&Document> = docs.iter().filter(|d| matches(d, &query.filter)).collect();
        sort_documents(&mut matched, &query.sort);

        let skip = usize::try_from(query.window.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.window.limit).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|d| project(d, &query.projection, &self.hidden))
            .collect())
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Queryable for MemoryCollection {
    type Error = MemoryError;

    fn count_documents(
        &self,
        filter: &Predicate,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send {
        ready(self.count_sync(filter))
    }

    fn find(
        &self,
        query: &QueryDescriptor,
    ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send {
        ready(self.find_sync(query))
    }
}

// ── Matching ────────────────────────────────────────────────────

fn matches(doc: &Document, predicate: &Predicate) -> bool {
    predicate.iter().all(|clause| matches_clause(doc, clause))
}

fn matches_clause(doc: &Document, clause: &Filter) -> bool {
    let stored = match get_path(doc, &clause.field) {
        Some(v) => v,
        None => return false,
    };

    match clause.operator {
        Operator::Eq => equals(stored, &clause.value),
        Operator::In => match &clause.value {
            Bson::Array(candidates) => candidates.iter().any(|c| equals(stored, c)),
            other => equals(stored, other),
        },
        Operator::Gt => compare_query(stored, &clause.value).is_some_and(Ordering::is_gt),
        Operator::Gte => compare_query(stored, &clause.value).is_some_and(Ordering::is_ge),
        Operator::Lt => compare_query(stored, &clause.value).is_some_and(Ordering::is_lt),
        Operator::Lte => compare_query(stored, &clause.value).is_some_and(Ordering::is_le),
    }
}

/// Array fields match when any element does.
fn equals(stored: &Bson, query: &Bson) -> bool {
    match stored {
        Bson::Array(items) if !matches!(query, Bson::Array(_)) => {
            items.iter().any(|item| compare_query(item, query) == Some(Ordering::Equal))
        }
        _ => compare_query(stored, query) == Some(Ordering::Equal),
    }
}

/// Compare a stored value with a query value, coercing string query values
/// to the stored type. `None` means the two cannot be compared.
fn compare_query(stored: &Bson, query: &Bson) -> Option<Ordering> {
    match (stored, query) {
        (Bson::String(a), Bson::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => {
            Some(a.timestamp_millis().cmp(&b.timestamp_millis()))
        }
        (Bson::ObjectId(a), Bson::ObjectId(b)) => Some(a.bytes().cmp(&b.bytes())),

        // ── Cross-type coercion: string query value → stored type ─
        (a, Bson::String(s)) if as_number(a).is_some() => {
            let b = s.trim().parse::<f64>().ok()?;
            as_number(a)?.partial_cmp(&b)
        }
        (Bson::Boolean(a), Bson::String(s)) => s.parse::<bool>().ok().map(|b| a.cmp(&b)),
        (Bson::DateTime(a), Bson::String(s)) => bson::DateTime::parse_rfc3339_str(s)
            .ok()
            .map(|b| a.timestamp_millis().cmp(&b.timestamp_millis())),
        (Bson::ObjectId(a), Bson::String(s)) => Some(a.to_hex().as_str().cmp(s.as_str())),

        (a, b) => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Resolve a dotted path such as `startLocation.address`.
fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(sub) => sub.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

// ── Sorting ─────────────────────────────────────────────────────

fn sort_documents(docs: &mut [&Document], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }
    docs.sort_by(|a, b| {
        for sort in sorts {
            let ord = compare_field_values(get_path(a, &sort.field), get_path(b, &sort.field));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Missing and null sort first, then values by type rank, then by value.
fn compare_field_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None | Some(Bson::Null), None | Some(Bson::Null)) => Ordering::Equal,
        (None | Some(Bson::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Bson::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| compare_same_rank(a, b)),
    }
}

/// Total order within one type rank. NaN sorts ahead of every other number.
fn compare_same_rank(a: &Bson, b: &Bson) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(a), Some(b)) => match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        },
        _ => compare_query(a, b).unwrap_or(Ordering::Equal),
    }
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 1,
        Bson::String(_) => 2,
        Bson::Document(_) => 3,
        Bson::Array(_) => 4,
        Bson::ObjectId(_) => 5,
        Bson::Boolean(_) => 6,
        Bson::DateTime(_) => 7,
        _ => 8,
    }
}

// ── Projection ──────────────────────────────────────────────────

fn project(doc: &Document, projection: &Projection, hidden: &[String]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc {
        if hidden.iter().any(|h| h == key) {
            continue;
        }
        let kept = match projection {
            Projection::All => Some(value.clone()),
            Projection::Include(_) if key == "_id" => Some(value.clone()),
            Projection::Include(fields) => include_value(key, value, &as_paths(fields)),
            Projection::Exclude(fields) => exclude_value(key, value, &as_paths(fields)),
        };
        if let Some(value) = kept {
            out.insert(key.clone(), value);
        }
    }
    out
}

fn as_paths(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}

/// Whether `key` itself is named, and the remainders of dotted paths below it.
fn split_paths<'p>(key: &str, paths: &[&'p str]) -> (bool, Vec<&'p str>) {
    let mut whole = false;
    let mut below = Vec::new();
    for path in paths {
        if *path == key {
            whole = true;
        } else if let Some(rest) = path.strip_prefix(key).and_then(|r| r.strip_prefix('.')) {
            if !rest.is_empty() {
                below.push(rest);
            }
        }
    }
    (whole, below)
}

fn include_value(key: &str, value: &Bson, paths: &[&str]) -> Option<Bson> {
    let (whole, below) = split_paths(key, paths);
    if whole {
        return Some(value.clone());
    }
    if below.is_empty() {
        return None;
    }
    match value {
        Bson::Document(sub) => Some(Bson::Document(include_document(sub, &below))),
        Bson::Array(items) => Some(Bson::Array(
            items
                .iter()
                .filter_map(|item| match item {
                    Bson::Document(sub) => Some(Bson::Document(include_document(sub, &below))),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    }
}

fn include_document(doc: &Document, paths: &[&str]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc {
        if let Some(value) = include_value(key, value, paths) {
            out.insert(key.clone(), value);
        }
    }
    out
}

fn exclude_value(key: &str, value: &Bson, paths: &[&str]) -> Option<Bson> {
    let (whole, below) = split_paths(key, paths);
    if whole {
        return None;
    }
    if below.is_empty() {
        return Some(value.clone());
    }
    match value {
        Bson::Document(sub) => Some(Bson::Document(exclude_document(sub, &below))),
        Bson::Array(items) => Some(Bson::Array(
            items
                .iter()
                .map(|item| match item {
                    Bson::Document(sub) => Bson::Document(exclude_document(sub, &below)),
                    other => other.clone(),
                })
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

fn exclude_document(doc: &Document, paths: &[&str]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc {
        if let Some(value) = exclude_value(key, value, paths) {
            out.insert(key.clone(), value);
        }
    }
    out
}
