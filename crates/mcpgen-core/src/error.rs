use thiserror::Error;

use crate::ir::Finding;

/// The source document does not conform to the OpenAPI shape this crate reads.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl ParseError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Remote, malformed, or otherwise locally unresolvable pointer.
    #[error("unsupported reference: {0}")]
    UnsupportedReference(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid document: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("referential integrity violated ({} finding(s)): {}", .0.len(), summarize(.0))]
    ReferentialIntegrity(Vec<Finding>),
}

fn summarize(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
