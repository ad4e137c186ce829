use indexmap::IndexMap;
use serde::Deserialize;

/// OAuth2 flows configuration (3.x).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OAuthFlows {
    #[serde(default)]
    pub implicit: Option<OAuthFlow>,
    #[serde(default)]
    pub password: Option<OAuthFlow>,
    #[serde(rename = "clientCredentials", default)]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(rename = "authorizationCode", default)]
    pub authorization_code: Option<OAuthFlow>,
}

/// A single OAuth2 flow (3.x).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl", default)]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", default)]
    pub token_url: Option<String>,
    #[serde(rename = "refreshUrl", default)]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// A security scheme definition, covering both dialects.
///
/// `type` stays a string: 2.x `basic` and 3.x `http` are both copied verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in", default)]
    pub location: Option<String>,

    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(rename = "bearerFormat", default)]
    pub bearer_format: Option<String>,

    #[serde(default)]
    pub flows: Option<OAuthFlows>,

    #[serde(rename = "openIdConnectUrl", default)]
    pub open_id_connect_url: Option<String>,

    // 2.x oauth2 carries a single flow on the scheme itself.
    #[serde(default)]
    pub flow: Option<String>,
    #[serde(rename = "authorizationUrl", default)]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}
