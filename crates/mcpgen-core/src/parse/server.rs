use indexmap::IndexMap;
use serde::Deserialize;

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerVariable {
    pub default: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<String>,
}

/// A 3.x server URL definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}
