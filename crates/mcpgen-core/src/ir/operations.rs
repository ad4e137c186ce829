use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schemas::TypeRef;

/// HTTP method. Only the verbs modeled by the IR; `TRACE` and vendor verbs are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Match a path-item key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }

    pub fn is_idempotent(&self) -> bool {
        self.is_safe() || matches!(self, HttpMethod::Put | HttpMethod::Delete)
    }
}

/// One API action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    /// The source `operationId`.
    pub name: String,
    pub transport: String,
    pub method: HttpMethod,
    pub path_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub inputs: Inputs,
    pub outputs: Outputs,
    pub semantics: Semantics,
}

impl Operation {
    /// Every `TypeRef` reachable from this operation's inputs and outputs.
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.inputs
            .path_params
            .values()
            .chain(self.inputs.query_params.values())
            .chain(self.inputs.headers.values())
            .chain(self.inputs.body.iter().map(|b| &b.schema))
            .chain(
                self.outputs
                    .success
                    .iter()
                    .chain(self.outputs.errors.iter())
                    .filter_map(|r| r.schema.as_ref()),
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_params: IndexMap<String, TypeRef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query_params: IndexMap<String, TypeRef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub content_types: Vec<String>,
    pub schema: TypeRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outputs {
    #[serde(default)]
    pub success: Vec<Response>,
    /// Non-2xx responses are not modeled; kept for a stable document shape.
    #[serde(default)]
    pub errors: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TypeRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semantics {
    pub idempotent: bool,
    pub safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginated: Option<Pagination>,
}

/// How a list operation pages through results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub mode: PaginationMode,
    /// Role (`cursor`, `offset`, `limit`, `page`, `pageSize`) → query parameter name.
    #[serde(default)]
    pub request: IndexMap<String, String>,
    /// Role (`nextCursor`) → response property name.
    #[serde(default)]
    pub response: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    Cursor,
    Offset,
    Page,
}
