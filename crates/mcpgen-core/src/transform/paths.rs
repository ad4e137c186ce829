use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::{ParseError, TransformError};
use crate::ir::{
    Body, HttpMethod, Inputs, Operation, Outputs, Pagination, PaginationMode, Response, Semantics,
    TypeRef,
};
use crate::parse::media_type::preferred_schema;
use crate::parse::operation::Operation as SourceOperation;
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::request_body::RequestBody;
use crate::parse::response::Response as SourceResponse;
use crate::parse::{Dialect, Document, Section, view};

use super::Warning;
use super::identity::stable_id;
use super::name_normalizer::context_name;
use super::schemas::SchemaTransformer;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

const CURSOR_PARAMS: &[&str] = &["cursor", "pageToken", "page_token", "after"];
const LIMIT_PARAMS: &[&str] = &["limit", "pageSize", "page_size", "per_page"];
const PAGE_SIZE_PARAMS: &[&str] = &["per_page", "pageSize", "page_size"];
const NEXT_CURSOR_FIELDS: &[&str] = &[
    "nextCursor",
    "next_cursor",
    "nextPageToken",
    "next_page_token",
    "next",
];

/// Convert every path × verb entry into an IR operation.
///
/// Operations without an `operationId` are dropped with a warning, as are
/// cookie and formData parameters.
pub fn transform_paths<'a>(
    doc: &'a Document,
    schemas: &mut SchemaTransformer<'a>,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Operation>, TransformError> {
    let mut operations = Vec::new();
    let Some(paths) = doc.paths() else {
        return Ok(operations);
    };

    for (path, item) in paths {
        let item = item.as_object().ok_or_else(|| {
            ParseError::invalid(format!("paths.{path}"), "path item must be a mapping")
        })?;
        let shared: &[Value] = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for (key, raw) in item {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let at = format!("paths.{path}.{key}");
            let source: SourceOperation = view(raw, &at)?;
            let Some(name) = source.operation_id.clone() else {
                warn!("dropping {} {path}: no operationId", method.as_str());
                warnings.push(Warning::new(at, "operation has no operationId; dropped"));
                continue;
            };

            let ctx = OperationContext {
                doc,
                resolver: RefResolver::new(doc),
                path,
                method,
                name: &name,
                at: &at,
            };
            let operation = ctx.build(raw, source, shared, schemas, warnings)?;
            debug!("operation {} {} {}", operation.name, method.as_str(), path);
            operations.push(operation);
        }
    }

    Ok(operations)
}

struct OperationContext<'c, 'a> {
    doc: &'a Document,
    resolver: RefResolver<'a>,
    path: &'c str,
    method: HttpMethod,
    name: &'c str,
    at: &'c str,
}

impl<'a> OperationContext<'_, 'a> {
    fn build(
        &self,
        raw: &Value,
        source: SourceOperation,
        shared: &[Value],
        schemas: &mut SchemaTransformer<'a>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Operation, TransformError> {
        let mut inputs = self.inputs(&source, shared, schemas, warnings)?;
        if self.doc.dialect() == Dialect::V3 {
            if let Some(request_body) = &source.request_body {
                inputs.body = self.request_body(request_body, schemas, warnings)?;
            }
        }

        let success = self.responses(&source, schemas, warnings)?;
        let paginated = detect_pagination(&inputs.query_params, &success, schemas);

        Ok(Operation {
            id: stable_id(raw),
            name: self.name.to_string(),
            transport: "http".to_string(),
            method: self.method,
            path_template: self.path.to_string(),
            summary: source.summary,
            description: source.description,
            tags: source.tags,
            inputs,
            outputs: Outputs {
                success,
                errors: Vec::new(),
            },
            semantics: Semantics {
                idempotent: self.method.is_idempotent(),
                safe: self.method.is_safe(),
                paginated,
            },
        })
    }

    /// Path-item parameters overlaid by the operation's own (same name and
    /// location: the operation wins), split by location.
    fn inputs(
        &self,
        source: &SourceOperation,
        shared: &[Value],
        schemas: &mut SchemaTransformer<'a>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Inputs, TransformError> {
        let mut merged: IndexMap<(String, ParameterLocation), (Parameter, &Value)> =
            IndexMap::new();
        let declared = [
            (shared, format!("paths.{}.parameters", self.path)),
            (source.parameters.as_slice(), format!("{}.parameters", self.at)),
        ];
        for (list, prefix) in &declared {
            for (i, raw) in list.iter().enumerate() {
                let resolved = self.resolver.deref_component(Section::Parameters, raw)?;
                let param: Parameter = view(resolved, &format!("{prefix}[{i}]"))?;
                merged.insert((param.name.clone(), param.location), (param, resolved));
            }
        }

        let mut inputs = Inputs::default();
        for (param, raw) in merged.into_values() {
            let at = format!("{}.parameters.{}", self.at, param.name);
            let context = context_name(&[self.name, param.name.as_str()]);
            match param.location {
                ParameterLocation::Path => {
                    let r = schemas.type_ref(&param.schema_fragment(raw), &context, &at)?;
                    inputs.path_params.insert(param.name, r);
                }
                ParameterLocation::Query => {
                    let r = schemas.type_ref(&param.schema_fragment(raw), &context, &at)?;
                    inputs.query_params.insert(param.name, r);
                }
                ParameterLocation::Header => {
                    let r = schemas.type_ref(&param.schema_fragment(raw), &context, &at)?;
                    inputs.headers.insert(param.name, r);
                }
                ParameterLocation::Body => {
                    let fragment = param
                        .schema
                        .clone()
                        .unwrap_or_else(|| Value::Object(Map::new()));
                    let context = context_name(&[self.name, "Body"]);
                    let schema = schemas.type_ref(&fragment, &context, &at)?;
                    inputs.body = Some(Body {
                        content_types: self.v2_media_types(source.consumes.as_ref(), "consumes"),
                        schema,
                    });
                }
                ParameterLocation::Cookie | ParameterLocation::FormData => {
                    let location = match param.location {
                        ParameterLocation::Cookie => "cookie",
                        _ => "formData",
                    };
                    warn!("{}: skipping {location} parameter {}", self.name, param.name);
                    warnings.push(Warning::new(
                        at,
                        format!("{location} parameters are not modeled; skipped"),
                    ));
                }
            }
        }
        Ok(inputs)
    }

    fn request_body(
        &self,
        raw: &Value,
        schemas: &mut SchemaTransformer<'a>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Body>, TransformError> {
        let at = format!("{}.requestBody", self.at);
        let resolved = self.resolver.deref_component(Section::RequestBodies, raw)?;
        let body: RequestBody = view(resolved, &at)?;

        let Some(schema) = preferred_schema(&body.content) else {
            warn!("{}: request body has no schema", self.name);
            warnings.push(Warning::new(at, "request body has no schema; omitted"));
            return Ok(None);
        };
        let context = context_name(&[self.name, "Body"]);
        let schema = schemas.type_ref(schema, &context, &at)?;
        Ok(Some(Body {
            content_types: body.content.keys().cloned().collect(),
            schema,
        }))
    }

    /// Success responses: numeric status codes starting with `2`.
    fn responses(
        &self,
        source: &SourceOperation,
        schemas: &mut SchemaTransformer<'a>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<Response>, TransformError> {
        let mut success = Vec::new();
        for (code, raw) in &source.responses {
            if !code.starts_with('2') {
                continue;
            }
            let at = format!("{}.responses.{code}", self.at);
            let Ok(status) = code.parse::<u16>() else {
                warn!("{}: skipping non-numeric status {code}", self.name);
                warnings.push(Warning::new(at, "non-numeric status code; skipped"));
                continue;
            };

            let resolved = self.resolver.deref_component(Section::Responses, raw)?;
            let response: SourceResponse = view(resolved, &at)?;
            let schema = match response.body_schema() {
                Some(fragment) => {
                    let context = format!("{}Response{status}", context_name(&[self.name]));
                    Some(schemas.type_ref(fragment, &context, &at)?)
                }
                None => None,
            };
            let content_types = match self.doc.dialect() {
                Dialect::V3 => response.content.keys().cloned().collect(),
                Dialect::V2 if schema.is_some() => {
                    self.v2_media_types(source.produces.as_ref(), "produces")
                }
                Dialect::V2 => Vec::new(),
            };

            success.push(Response {
                status,
                content_types,
                schema,
            });
        }
        Ok(success)
    }

    /// 2.x media types: the operation's list, else the document's, else JSON.
    fn v2_media_types(&self, own: Option<&Vec<String>>, key: &str) -> Vec<String> {
        if let Some(own) = own {
            return own.clone();
        }
        let document = match key {
            "consumes" => self.doc.consumes(),
            _ => self.doc.produces(),
        };
        if document.is_empty() {
            vec![DEFAULT_CONTENT_TYPE.to_string()]
        } else {
            document
        }
    }
}

/// Infer a pagination style from query parameter names, and the response
/// field carrying the next cursor from the first success response's type.
fn detect_pagination(
    query: &IndexMap<String, TypeRef>,
    success: &[Response],
    schemas: &SchemaTransformer<'_>,
) -> Option<Pagination> {
    let find = |candidates: &[&str]| {
        candidates
            .iter()
            .find(|name| query.contains_key(**name))
            .map(|name| name.to_string())
    };

    let mut request = IndexMap::new();
    let mode = if let Some(cursor) = find(CURSOR_PARAMS) {
        request.insert("cursor".to_string(), cursor);
        if let Some(limit) = find(LIMIT_PARAMS) {
            request.insert("limit".to_string(), limit);
        }
        PaginationMode::Cursor
    } else if query.contains_key("offset") {
        request.insert("offset".to_string(), "offset".to_string());
        if query.contains_key("limit") {
            request.insert("limit".to_string(), "limit".to_string());
        }
        PaginationMode::Offset
    } else if query.contains_key("page") {
        request.insert("page".to_string(), "page".to_string());
        if let Some(size) = find(PAGE_SIZE_PARAMS) {
            request.insert("pageSize".to_string(), size);
        }
        PaginationMode::Page
    } else {
        return None;
    };

    let mut response = IndexMap::new();
    let next = success
        .first()
        .and_then(|r| r.schema.as_ref())
        .and_then(|r| schemas.get(&r.type_id))
        .and_then(|ty| {
            NEXT_CURSOR_FIELDS
                .iter()
                .find(|field| ty.properties.contains_key(**field))
        });
    if let Some(field) = next {
        response.insert("nextCursor".to_string(), field.to_string());
    }

    Some(Pagination {
        mode,
        request,
        response,
    })
}
