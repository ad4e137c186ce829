use log::debug;
use serde_json::Value;

use crate::error::TransformError;
use crate::ir::{Server, ServerVariable, Service};
use crate::parse::document::string_list;
use crate::parse::{Dialect, Document};

use super::name_normalizer::service_id;

const DEFAULT_SCHEMES: &[&str] = &["http"];

/// Service metadata from `info`. `baseUrls` is filled in by the builder.
pub fn extract_service(doc: &Document) -> Service {
    let info = doc.info();
    Service {
        id: service_id(&info.title),
        title: info.title.clone(),
        version: info.version.clone(),
        description: info.description.clone(),
        base_urls: Vec::new(),
    }
}

/// Base URLs: explicit 3.x `servers`, or 2.x `host` + `basePath` expanded
/// once per scheme.
pub fn extract_servers(doc: &Document) -> Result<Vec<Server>, TransformError> {
    let servers = match doc.dialect() {
        Dialect::V3 => doc
            .servers()?
            .into_iter()
            .map(|s| Server {
                url: s.url,
                variables: s
                    .variables
                    .into_iter()
                    .map(|(name, v)| {
                        let variable = ServerVariable {
                            default: v.default,
                            enum_values: v.enum_values,
                            description: v.description,
                        };
                        (name, variable)
                    })
                    .collect(),
            })
            .collect(),
        Dialect::V2 => v2_servers(doc),
    };
    for server in &servers {
        debug!("server {}", server.url);
    }
    Ok(servers)
}

fn v2_servers(doc: &Document) -> Vec<Server> {
    let base_path = doc
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim_end_matches('/');

    let Some(host) = doc.get("host").and_then(Value::as_str) else {
        // No host: only a relative base path can be offered.
        if base_path.is_empty() {
            return Vec::new();
        }
        return vec![server(base_path.to_string())];
    };

    let mut schemes = string_list(doc.get("schemes"));
    if schemes.is_empty() {
        schemes = DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect();
    }
    schemes
        .iter()
        .map(|scheme| server(format!("{scheme}://{host}{base_path}")))
        .collect()
}

fn server(url: String) -> Server {
    Server {
        url,
        variables: Default::default(),
    }
}
