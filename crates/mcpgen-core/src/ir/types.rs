use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operations::Operation;
use super::schemas::Type;
use super::security::SecurityScheme;

/// Version of the IR document shape written into [`Meta::ir_version`].
pub const IR_VERSION: &str = "1.0";

/// The canonical, framework-neutral document produced by the transform.
///
/// Built once by [`IrBuilder`](super::builder::IrBuilder) and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ir {
    pub service: Service,
    pub types: Vec<Type>,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub security_schemes: Vec<SecurityScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Ir {
    pub fn find_type(&self, id: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn find_type_by_name(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn find_operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub base_urls: Vec<String>,
}

/// A base URL plus its template variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Provenance of an IR document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub ir_version: String,
    /// SHA-256 of the canonical encoding of the whole source document.
    pub spec_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub generator: String,
}
