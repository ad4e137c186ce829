use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;

use super::server::Server;
use super::view;

/// Which OpenAPI document shape the source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Swagger / OpenAPI 2.x: `definitions`, `securityDefinitions`, `host`.
    V2,
    /// OpenAPI 3.x: `components.*`, `servers`.
    V3,
}

/// Reusable component sections, each stored in a dialect-specific place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Schemas,
    Parameters,
    Responses,
    RequestBodies,
    SecuritySchemes,
}

impl Section {
    /// Local pointer prefix for `$ref`s into this section.
    pub fn pointer_prefix(&self, dialect: Dialect) -> Option<&'static str> {
        match (dialect, self) {
            (Dialect::V2, Section::Schemas) => Some("#/definitions/"),
            (Dialect::V2, Section::Parameters) => Some("#/parameters/"),
            (Dialect::V2, Section::Responses) => Some("#/responses/"),
            (Dialect::V2, Section::RequestBodies) => None,
            (Dialect::V2, Section::SecuritySchemes) => None,
            (Dialect::V3, Section::Schemas) => Some("#/components/schemas/"),
            (Dialect::V3, Section::Parameters) => Some("#/components/parameters/"),
            (Dialect::V3, Section::Responses) => Some("#/components/responses/"),
            (Dialect::V3, Section::RequestBodies) => Some("#/components/requestBodies/"),
            (Dialect::V3, Section::SecuritySchemes) => Some("#/components/securitySchemes/"),
        }
    }

    fn v2_key(&self) -> Option<&'static str> {
        match self {
            Section::Schemas => Some("definitions"),
            Section::Parameters => Some("parameters"),
            Section::Responses => Some("responses"),
            Section::RequestBodies => None,
            Section::SecuritySchemes => Some("securityDefinitions"),
        }
    }

    fn v3_key(&self) -> &'static str {
        match self {
            Section::Schemas => "schemas",
            Section::Parameters => "parameters",
            Section::Responses => "responses",
            Section::RequestBodies => "requestBodies",
            Section::SecuritySchemes => "securitySchemes",
        }
    }
}

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// A loaded OpenAPI document: the generic mapping plus the few facts every
/// transformer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
    dialect: Dialect,
    info: Info,
}

impl Document {
    /// Check the root shape and detect the dialect.
    pub fn new(root: Value) -> Result<Self, ParseError> {
        let obj = root
            .as_object()
            .ok_or_else(|| ParseError::invalid("$", "document root must be a mapping"))?;

        let dialect = detect_dialect(obj)?;

        let info_value = obj
            .get("info")
            .ok_or_else(|| ParseError::MissingField("info".to_string()))?;
        let info: Info = view(info_value, "info")?;

        if let Some(paths) = obj.get("paths") {
            if !paths.is_object() {
                return Err(ParseError::invalid("paths", "must be a mapping"));
            }
        }

        Ok(Self {
            root,
            dialect,
            info,
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// The mapping for a component section in this document's dialect.
    pub fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        let value = match self.dialect {
            Dialect::V2 => self.root.get(section.v2_key()?),
            Dialect::V3 => self
                .root
                .get("components")
                .and_then(|c| c.get(section.v3_key())),
        };
        value.and_then(Value::as_object)
    }

    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.section(Section::Schemas)
    }

    pub fn security_schemes(&self) -> Option<&Map<String, Value>> {
        self.section(Section::SecuritySchemes)
    }

    /// Explicit 3.x `servers` entries.
    pub fn servers(&self) -> Result<Vec<Server>, ParseError> {
        match self.root.get("servers") {
            Some(servers) => view(servers, "servers"),
            None => Ok(Vec::new()),
        }
    }

    /// Document-level `consumes` (2.x).
    pub fn consumes(&self) -> Vec<String> {
        string_list(self.root.get("consumes"))
    }

    /// Document-level `produces` (2.x).
    pub fn produces(&self) -> Vec<String> {
        string_list(self.root.get("produces"))
    }
}

fn detect_dialect(obj: &Map<String, Value>) -> Result<Dialect, ParseError> {
    if let Some(version) = obj.get("openapi") {
        let version = version
            .as_str()
            .ok_or_else(|| ParseError::invalid("openapi", "must be a string"))?;
        if version.starts_with("3.") {
            return Ok(Dialect::V3);
        }
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }
    if let Some(version) = obj.get("swagger") {
        let version = version
            .as_str()
            .ok_or_else(|| ParseError::invalid("swagger", "must be a string"))?;
        if version.starts_with("2.") {
            return Ok(Dialect::V2);
        }
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }
    Err(ParseError::MissingField("openapi".to_string()))
}

pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
