use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Content-addressed identifier of a [`Type`]: lowercase hex SHA-256.
pub type TypeId = String;

/// A named schema node in the IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared JSON scalar for primitive and enum kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<ScalarType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<TypeRef>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    /// Other definition names whose fragments hash to this same id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Type {
    /// Every `TypeRef` this type points at, in declaration order.
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.properties
            .values()
            .chain(self.items.iter())
            .chain(self.additional_properties.iter())
            .chain(self.one_of.iter())
            .chain(self.all_of.iter())
    }
}

/// Closed classification of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Primitive,
    Object,
    Array,
    Enum,
    OneOf,
    AllOf,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Object => "object",
            TypeKind::Array => "array",
            TypeKind::Enum => "enum",
            TypeKind::OneOf => "oneOf",
            TypeKind::AllOf => "allOf",
        }
    }
}

/// JSON scalar named by a schema's `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    /// Swagger 2.0 `formData` upload.
    File,
}

/// A by-id reference to a [`Type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub type_id: TypeId,
    #[serde(default)]
    pub nullable: bool,
}

impl TypeRef {
    pub fn new(type_id: impl Into<TypeId>) -> Self {
        Self {
            type_id: type_id.into(),
            nullable: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Validation keywords carried over from the source fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.pattern.is_none()
    }
}
