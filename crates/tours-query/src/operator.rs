use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Recognize the bracketed suffix of a `field[op]` parameter key.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            _ => None,
        }
    }

    /// Canonical comparison token.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::In => "in",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }

    /// Operator key in a Mongo-style filter document.
    pub fn mongo_key(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::In => "$in",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_map_to_comparisons() {
        assert_eq!(Operator::from_suffix("gte"), Some(Operator::Gte));
        assert_eq!(Operator::from_suffix("gt"), Some(Operator::Gt));
        assert_eq!(Operator::from_suffix("lte"), Some(Operator::Lte));
        assert_eq!(Operator::from_suffix("lt"), Some(Operator::Lt));
    }

    #[test]
    fn equality_is_not_a_suffix() {
        assert_eq!(Operator::from_suffix("eq"), None);
        assert_eq!(Operator::from_suffix("GTE"), None);
        assert_eq!(Operator::from_suffix(""), None);
    }

    #[test]
    fn tokens() {
        assert_eq!(Operator::Gte.to_string(), ">=");
        assert_eq!(Operator::Lt.to_string(), "<");
        assert_eq!(Operator::Eq.mongo_key(), "$eq");
    }
}
