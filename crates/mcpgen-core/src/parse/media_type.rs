use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// A media type object (3.x `content` entry).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,
}

/// Pick the schema of a `content` mapping: `application/json` if it has one,
/// else the first entry that does.
pub fn preferred_schema(content: &IndexMap<String, MediaType>) -> Option<&Value> {
    content
        .get("application/json")
        .and_then(|mt| mt.schema.as_ref())
        .or_else(|| content.values().find_map(|mt| mt.schema.as_ref()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn content(value: Value) -> IndexMap<String, MediaType> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_prefers_json() {
        let c = content(json!({
            "text/plain": {"schema": {"type": "string"}},
            "application/json": {"schema": {"type": "object"}}
        }));
        assert_eq!(preferred_schema(&c), Some(&json!({"type": "object"})));
    }

    #[test]
    fn test_falls_back_to_first_with_schema() {
        let c = content(json!({
            "application/octet-stream": {},
            "text/plain": {"schema": {"type": "string"}}
        }));
        assert_eq!(preferred_schema(&c), Some(&json!({"type": "string"})));
    }

    #[test]
    fn test_no_schema() {
        let c = content(json!({"application/json": {}}));
        assert_eq!(preferred_schema(&c), None);
    }
}
