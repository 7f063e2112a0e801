use std::fmt;

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::operator::Operator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: Bson,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Bson>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Bson::String(s) => write!(f, "{} {} {}", self.field, self.operator, s),
            other => write!(f, "{} {} {}", self.field, self.operator, other),
        }
    }
}

/// Conjunction of field clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Predicate {
    clauses: Vec<Filter>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Filter) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Filter] {
        &self.clauses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render as a Mongo-style filter document.
    ///
    /// A field with a single equality clause becomes `{ field: value }`.
    /// Anything else becomes an operator sub-document, so
    /// `price[gte]=5&price[lt]=9` renders as
    /// `{ "price": { "$gte": "5", "$lt": "9" } }`.
    pub fn to_document(&self) -> Document {
        let mut fields: Vec<(&str, Vec<&Filter>)> = Vec::new();
        for clause in &self.clauses {
            match fields.iter_mut().find(|(f, _)| *f == clause.field) {
                Some((_, group)) => group.push(clause),
                None => fields.push((&clause.field, vec![clause])),
            }
        }

        let mut doc = Document::new();
        for (field, group) in fields {
            if group.len() == 1 && group[0].operator == Operator::Eq {
                doc.insert(field, group[0].value.clone());
                continue;
            }
            let mut ops = Document::new();
            for clause in group {
                ops.insert(clause.operator.mongo_key(), clause.value.clone());
            }
            doc.insert(field, ops);
        }
        doc
    }
}

impl FromIterator<Filter> for Predicate {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn display_uses_canonical_token() {
        let clause = Filter::new("price", Operator::Gte, "100");
        assert_eq!(clause.to_string(), "price >= 100");
    }

    #[test]
    fn bare_equality_renders_plain_value() {
        let predicate: Predicate = [Filter::new("difficulty", Operator::Eq, "easy")]
            .into_iter()
            .collect();
        assert_eq!(predicate.to_document(), doc! { "difficulty": "easy" });
    }

    #[test]
    fn operators_on_one_field_merge() {
        let predicate: Predicate = [
            Filter::new("price", Operator::Gte, "5"),
            Filter::new("duration", Operator::Eq, "7"),
            Filter::new("price", Operator::Lt, "9"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            predicate.to_document(),
            doc! { "price": { "$gte": "5", "$lt": "9" }, "duration": "7" }
        );
    }

    #[test]
    fn equality_next_to_comparison_uses_eq_key() {
        let predicate: Predicate = [
            Filter::new("price", Operator::Eq, "5"),
            Filter::new("price", Operator::Lte, "9"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            predicate.to_document(),
            doc! { "price": { "$eq": "5", "$lte": "9" } }
        );
    }

    #[test]
    fn membership_renders_in() {
        let predicate: Predicate = [Filter::new(
            "difficulty",
            Operator::In,
            vec![Bson::from("easy"), Bson::from("medium")],
        )]
        .into_iter()
        .collect();
        assert_eq!(
            predicate.to_document(),
            doc! { "difficulty": { "$in": ["easy", "medium"] } }
        );
    }

    #[test]
    fn empty_predicate_is_empty_document() {
        assert!(Predicate::new().to_document().is_empty());
    }
}
