use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::media_type::{MediaType, preferred_schema};

/// A response definition (either dialect).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    /// 2.x: the schema sits directly on the response.
    #[serde(default)]
    pub schema: Option<Value>,

    /// 3.x: schemas per media type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    pub fn body_schema(&self) -> Option<&Value> {
        self.schema
            .as_ref()
            .or_else(|| preferred_schema(&self.content))
    }
}
