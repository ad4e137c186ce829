use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;

use super::view;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Swagger 2.0 only, for `formData` uploads.
    File,
}

/// The `type` field can be a single type or (3.1) an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference or inline schema, borrowed from the source document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaOrRef<'a> {
    Ref(&'a str),
    Inline(&'a Value),
}

impl<'a> SchemaOrRef<'a> {
    /// A fragment with a string `$ref` is a reference; siblings are ignored.
    pub fn classify(fragment: &'a Value) -> Self {
        match fragment.get("$ref").and_then(Value::as_str) {
            Some(pointer) => SchemaOrRef::Ref(pointer),
            None => SchemaOrRef::Inline(fragment),
        }
    }
}

/// The scalar keywords of a schema the transformer reads. Sub-schemas
/// (`properties`, `items`, `oneOf`, ...) are walked on the raw fragment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaFacets {
    #[serde(rename = "type", default)]
    pub schema_type: Option<TypeSet>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub nullable: Option<bool>,

    #[serde(rename = "x-nullable", default)]
    pub x_nullable: Option<bool>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,

    #[serde(rename = "minLength", default)]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl SchemaFacets {
    /// Boolean schemas (3.1) carry no keywords and read as empty facets.
    pub fn read(fragment: &Value, at: &str) -> Result<Self, ParseError> {
        match fragment {
            Value::Object(_) => view(fragment, at),
            Value::Bool(_) => Ok(Self::default()),
            _ => Err(ParseError::invalid(at, "schema must be a mapping or a boolean")),
        }
    }

    /// The single non-null declared type, if any.
    pub fn primary_type(&self) -> Option<SchemaType> {
        match &self.schema_type {
            Some(TypeSet::Single(t)) => Some(*t),
            Some(TypeSet::Multiple(types)) => {
                let mut non_null = types.iter().filter(|t| **t != SchemaType::Null);
                match (non_null.next(), non_null.next()) {
                    (Some(t), None) => Some(*t),
                    (None, _) if types.contains(&SchemaType::Null) => Some(SchemaType::Null),
                    _ => None,
                }
            }
            None => None,
        }
    }

    /// Whether a value of this schema may be `null`, across dialects.
    pub fn is_nullable(&self) -> bool {
        let listed_null = matches!(
            &self.schema_type,
            Some(TypeSet::Multiple(types)) if types.len() > 1 && types.contains(&SchemaType::Null)
        );
        self.nullable.unwrap_or(false) || self.x_nullable.unwrap_or(false) || listed_null
    }
}

/// `properties` of a fragment, if it declares any.
pub fn properties(fragment: &Value) -> Option<&Map<String, Value>> {
    fragment.get("properties").and_then(Value::as_object)
}

/// Branches of a composition keyword (`oneOf`, `anyOf`, `allOf`).
pub fn branches<'a>(fragment: &'a Value, keyword: &str) -> &'a [Value] {
    fragment
        .get(keyword)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
