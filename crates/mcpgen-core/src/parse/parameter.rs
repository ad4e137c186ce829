use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::media_type::MediaType;

/// Parameter location as written in the source (`in`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    /// 2.x request body parameter.
    Body,
    /// 3.x only; not modeled by the IR.
    Cookie,
    /// 2.x only; not modeled by the IR.
    FormData,
}

/// An API parameter (either dialect).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    /// 3.x parameters and 2.x body parameters.
    #[serde(default)]
    pub schema: Option<Value>,

    /// 3.x complex parameters.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Schema keywords a 2.x non-body parameter carries inline.
const INLINE_SCHEMA_KEYWORDS: &[&str] = &[
    "type",
    "format",
    "items",
    "enum",
    "default",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "minItems",
    "maxItems",
    "uniqueItems",
    "multipleOf",
    "x-nullable",
];

impl Parameter {
    /// The structural schema fragment of this parameter.
    ///
    /// 3.x: `schema`, else the first `content` entry's schema. 2.x non-body:
    /// the schema keywords carried on the parameter object itself.
    pub fn schema_fragment(&self, raw: &Value) -> Value {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        if let Some(schema) = self.content.values().find_map(|mt| mt.schema.as_ref()) {
            return schema.clone();
        }
        let mut fragment = Map::new();
        if let Some(obj) = raw.as_object() {
            for keyword in INLINE_SCHEMA_KEYWORDS {
                if let Some(v) = obj.get(*keyword) {
                    fragment.insert((*keyword).to_string(), v.clone());
                }
            }
        }
        Value::Object(fragment)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse::view;

    #[test]
    fn test_v3_parameter_schema() {
        let raw = json!({"name": "limit", "in": "query", "schema": {"type": "integer"}});
        let p: Parameter = view(&raw, "p").unwrap();
        assert_eq!(p.location, ParameterLocation::Query);
        assert_eq!(p.schema_fragment(&raw), json!({"type": "integer"}));
    }

    #[test]
    fn test_v2_parameter_inline_keywords() {
        let raw = json!({
            "name": "name",
            "in": "query",
            "required": true,
            "description": "filter",
            "type": "string",
            "maxLength": 10
        });
        let p: Parameter = view(&raw, "p").unwrap();
        assert_eq!(p.name, "name");
        assert_eq!(
            p.schema_fragment(&raw),
            json!({"type": "string", "maxLength": 10})
        );
    }

    #[test]
    fn test_form_data_location() {
        let raw = json!({"name": "file", "in": "formData", "type": "file"});
        let p: Parameter = view(&raw, "p").unwrap();
        assert_eq!(p.location, ParameterLocation::FormData);
    }

    #[test]
    fn test_content_parameter() {
        let raw = json!({
            "name": "filter",
            "in": "query",
            "content": {"application/json": {"schema": {"type": "object"}}}
        });
        let p: Parameter = view(&raw, "p").unwrap();
        assert_eq!(p.schema_fragment(&raw), json!({"type": "object"}));
    }
}
