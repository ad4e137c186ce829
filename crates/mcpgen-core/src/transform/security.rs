use indexmap::IndexMap;
use log::debug;

use crate::error::TransformError;
use crate::ir::{OAuthFlow, OAuthFlowType, SecurityScheme};
use crate::parse::security::{OAuthFlow as SourceFlow, SecurityScheme as SourceScheme};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::{Document, Section, view};

use super::identity::stable_id;

/// Convert `securityDefinitions` (2.x) or `components.securitySchemes` (3.x).
pub fn transform_security_schemes(doc: &Document) -> Result<Vec<SecurityScheme>, TransformError> {
    let Some(definitions) = doc.security_schemes() else {
        return Ok(Vec::new());
    };

    let resolver = RefResolver::new(doc);
    let mut schemes = Vec::with_capacity(definitions.len());
    for (name, raw) in definitions {
        let raw = resolver.deref_component(Section::SecuritySchemes, raw)?;
        let source: SourceScheme = view(raw, &format!("securitySchemes.{name}"))?;
        let flows = flows(&source);
        debug!("security scheme {name} ({})", source.scheme_type);
        schemes.push(SecurityScheme {
            id: stable_id(raw),
            name: name.clone(),
            scheme_type: source.scheme_type,
            param_name: source.name,
            location: source.location,
            scheme: source.scheme,
            bearer_format: source.bearer_format,
            open_id_connect_url: source.open_id_connect_url,
            flows,
        });
    }
    Ok(schemes)
}

/// OAuth flow descriptors: the 3.x `flows` object in a fixed order, or the
/// single 2.x `flow` carried on the scheme itself.
fn flows(source: &SourceScheme) -> Vec<OAuthFlow> {
    if let Some(flows) = &source.flows {
        return [
            (OAuthFlowType::Implicit, &flows.implicit),
            (OAuthFlowType::Password, &flows.password),
            (OAuthFlowType::ClientCredentials, &flows.client_credentials),
            (OAuthFlowType::AuthorizationCode, &flows.authorization_code),
        ]
        .into_iter()
        .filter_map(|(flow_type, flow)| flow.as_ref().map(|f| from_v3(flow_type, f)))
        .collect();
    }

    let Some(flow_type) = source.flow.as_deref().and_then(v2_flow_type) else {
        return Vec::new();
    };
    vec![OAuthFlow {
        flow_type,
        auth_url: source.authorization_url.clone(),
        token_url: source.token_url.clone(),
        refresh_url: None,
        scopes: scope_names(&source.scopes),
    }]
}

fn from_v3(flow_type: OAuthFlowType, flow: &SourceFlow) -> OAuthFlow {
    OAuthFlow {
        flow_type,
        auth_url: flow.authorization_url.clone(),
        token_url: flow.token_url.clone(),
        refresh_url: flow.refresh_url.clone(),
        scopes: scope_names(&flow.scopes),
    }
}

fn v2_flow_type(flow: &str) -> Option<OAuthFlowType> {
    match flow {
        "implicit" => Some(OAuthFlowType::Implicit),
        "password" => Some(OAuthFlowType::Password),
        "application" => Some(OAuthFlowType::ClientCredentials),
        "accessCode" => Some(OAuthFlowType::AuthorizationCode),
        _ => None,
    }
}

fn scope_names(scopes: &IndexMap<String, String>) -> Vec<String> {
    scopes.keys().cloned().collect()
}
