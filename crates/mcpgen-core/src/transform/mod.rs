pub mod identity;
pub mod name_normalizer;
pub mod paths;
pub mod schemas;
pub mod security;
pub mod service;

use std::fmt;

use log::warn;
use serde::Serialize;

use crate::error::TransformError;
use crate::ir::{Finding, IR_VERSION, Ir, IrBuilder, Meta, integrity};
use crate::parse::Document;
use crate::parse::ref_resolve::RefResolver;

use paths::transform_paths;
use schemas::SchemaTransformer;
use security::transform_security_schemes;
use service::{extract_servers, extract_service};

/// Options controlling what the transform emits and how strict it is.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Attach the `meta` provenance block.
    pub meta: bool,
    /// Label recorded as `meta.source` (typically the input path).
    pub source: Option<String>,
    /// Fail with [`TransformError::ReferentialIntegrity`] when the finished
    /// IR has integrity findings.
    pub strict: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            meta: true,
            source: None,
            strict: false,
        }
    }
}

/// Something dropped or skipped while transforming. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Dotted location in the source document.
    pub location: String,
    pub message: String,
}

impl Warning {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A finished IR plus everything reported along the way.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub ir: Ir,
    pub warnings: Vec<Warning>,
    pub findings: Vec<Finding>,
}

/// Transform a loaded OpenAPI document into the IR with default options.
pub fn transform(doc: &Document) -> Result<Transformed, TransformError> {
    transform_with_options(doc, &TransformOptions::default())
}

/// Transform with explicit options.
pub fn transform_with_options(
    doc: &Document,
    options: &TransformOptions,
) -> Result<Transformed, TransformError> {
    let mut warnings = Vec::new();

    // Phase 1: Named schema definitions
    let mut schemas = SchemaTransformer::new(RefResolver::new(doc));
    schemas.transform_definitions(doc.schemas())?;

    // Phase 2: Operations (may register more anonymous types)
    let operations = transform_paths(doc, &mut schemas, &mut warnings)?;

    // Phase 3: Security schemes
    let security_schemes = transform_security_schemes(doc)?;

    // Phase 4: Service, servers and provenance
    let service = extract_service(doc);
    let servers = extract_servers(doc)?;
    let meta = options.meta.then(|| Meta {
        ir_version: IR_VERSION.to_string(),
        spec_digest: identity::digest(doc.root()),
        source: options.source.clone(),
        generator: format!("mcpgen-core {}", env!("CARGO_PKG_VERSION")),
    });

    let ir = IrBuilder::new(service)
        .servers(servers)
        .types(schemas.finish())
        .operations(operations)
        .security_schemes(security_schemes)
        .meta(meta)
        .build();

    // Phase 5: Integrity checks
    let findings = integrity::check(&ir);
    for finding in &findings {
        warn!("{finding}");
    }
    if options.strict && !findings.is_empty() {
        return Err(TransformError::ReferentialIntegrity(findings));
    }

    Ok(Transformed {
        ir,
        warnings,
        findings,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc() -> Document {
        Document::new(json!({
            "openapi": "3.0.3",
            "info": {"title": "Things", "version": "1.0.0"},
            "servers": [{"url": "https://things.example.com"}],
            "paths": {"/things": {"get": {
                "operationId": "listThings",
                "responses": {"200": {"description": "ok", "content": {"application/json": {
                    "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Thing"}}
                }}}}
            }}},
            "components": {"schemas": {
                "Thing": {"type": "object", "required": ["id"], "properties": {"id": {"type": "string"}}}
            }}
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_assembles_ir() {
        let out = transform(&doc()).unwrap();
        let ir = out.ir;
        assert_eq!(ir.service.id, "things");
        assert_eq!(ir.service.base_urls, vec!["https://things.example.com"]);
        assert_eq!(ir.operations.len(), 1);
        assert!(ir.find_type_by_name("Thing").is_some());
        assert!(ir.find_type_by_name("ListThingsResponse200").is_some());
        assert!(out.warnings.is_empty());
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_meta_block() {
        let d = doc();
        let options = TransformOptions {
            source: Some("things.yaml".to_string()),
            ..Default::default()
        };
        let meta = transform_with_options(&d, &options).unwrap().ir.meta.unwrap();
        assert_eq!(meta.ir_version, "1.0");
        assert_eq!(meta.spec_digest, identity::digest(d.root()));
        assert_eq!(meta.source.as_deref(), Some("things.yaml"));
        assert!(meta.generator.starts_with("mcpgen-core "));
    }

    #[test]
    fn test_meta_can_be_disabled() {
        let options = TransformOptions {
            meta: false,
            ..Default::default()
        };
        assert!(transform_with_options(&doc(), &options).unwrap().ir.meta.is_none());
    }

    #[test]
    fn test_strict_fails_on_findings() {
        let d = Document::new(json!({
            "openapi": "3.0.3",
            "info": {"title": "T", "version": "1"},
            "components": {"schemas": {
                "Broken": {"type": "object", "required": ["missing"], "properties": {}}
            }}
        }))
        .unwrap();

        let lenient = transform(&d).unwrap();
        assert_eq!(lenient.findings.len(), 1);

        let options = TransformOptions {
            strict: true,
            ..Default::default()
        };
        let err = transform_with_options(&d, &options).unwrap_err();
        assert!(matches!(err, TransformError::ReferentialIntegrity(f) if f.len() == 1));
    }
}
