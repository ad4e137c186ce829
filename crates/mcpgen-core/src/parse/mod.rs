pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
pub use document::{Dialect, Document, Info, Section};

/// Parse an OpenAPI 2.x/3.x document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    // Go through the YAML value model first so unquoted status-code keys
    // (`200:`) become string keys instead of failing.
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    let root = serde_json::to_value(yaml)?;
    Document::new(root)
}

/// Parse an OpenAPI 2.x/3.x document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let root: Value = serde_json::from_str(input)?;
    Document::new(root)
}

/// Deserialize a typed view of a fragment, naming `at` on failure.
pub(crate) fn view<'de, T: Deserialize<'de>>(value: &'de Value, at: &str) -> Result<T, ParseError> {
    T::deserialize(value).map_err(|e| ParseError::invalid(at, e.to_string()))
}
