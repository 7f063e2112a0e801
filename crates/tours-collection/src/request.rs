use bson::Document;
use serde::{Deserialize, Serialize};
use tours_query::PageWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub tours: Vec<Document>,
    pub window: PageWindow,
}

impl QueryResponse {
    pub fn results(&self) -> usize {
        self.tours.len()
    }

    /// `{ "status": "success", "results": n, "data": { "tours": [...] } }`
    pub fn to_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        Ok(serde_json::json!({
            "status": "success",
            "results": self.results(),
            "data": { "tours": serde_json::to_value(&self.tours)? },
        }))
    }
}
