use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// An API operation (method-level object of a path item).
///
/// Parameters, request body and responses are kept raw because any of them
/// may be a `$ref` that the transformer resolves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(rename = "requestBody", default)]
    pub request_body: Option<Value>,

    #[serde(default)]
    pub responses: IndexMap<String, Value>,

    /// 2.x media types accepted by this operation.
    #[serde(default)]
    pub consumes: Option<Vec<String>>,

    /// 2.x media types produced by this operation.
    #[serde(default)]
    pub produces: Option<Vec<String>>,
}
