use serde_json::Value;

use super::document::{Dialect, Document, Section};
use crate::error::ResolveError;

const SCHEMA_POINTER_PREFIXES: [&str; 2] = ["#/definitions/", "#/components/schemas/"];

/// Map a local schema pointer to the schema name it names.
///
/// Only `#/definitions/<name>` and `#/components/schemas/<name>` are
/// recognized. Remote URIs and pointers into any other location (including
/// below a schema, like `.../Pet/properties/id`) are unsupported.
pub fn schema_name(pointer: &str) -> Result<String, ResolveError> {
    SCHEMA_POINTER_PREFIXES
        .iter()
        .find_map(|prefix| pointer.strip_prefix(prefix))
        .and_then(decode_segment)
        .ok_or_else(|| ResolveError::UnsupportedReference(pointer.to_string()))
}

/// Decode one JSON-pointer segment (`~1` → `/`, `~0` → `~`). `None` if the
/// rest of the pointer is not exactly one non-empty segment.
fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(segment.replace("~1", "/").replace("~0", "~"))
}

/// Looks up local component definitions. Never fetches anything.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    doc: &'a Document,
}

impl<'a> RefResolver<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    pub fn dialect(&self) -> Dialect {
        self.doc.dialect()
    }

    /// Resolve a schema pointer to its name and raw definition fragment.
    pub fn lookup_schema(&self, pointer: &str) -> Result<(String, &'a Value), ResolveError> {
        let name = schema_name(pointer)?;
        let fragment = self
            .doc
            .schemas()
            .and_then(|schemas| schemas.get(&name))
            .ok_or_else(|| ResolveError::UnsupportedReference(pointer.to_string()))?;
        Ok((name, fragment))
    }

    fn lookup_component(&self, section: Section, pointer: &str) -> Result<&'a Value, ResolveError> {
        let unsupported = || ResolveError::UnsupportedReference(pointer.to_string());
        let prefix = section
            .pointer_prefix(self.doc.dialect())
            .ok_or_else(unsupported)?;
        let name = pointer
            .strip_prefix(prefix)
            .and_then(decode_segment)
            .ok_or_else(unsupported)?;
        self.doc
            .section(section)
            .and_then(|entries| entries.get(&name))
            .ok_or_else(unsupported)
    }

    /// Follow a component `$ref` if the fragment is one, else return it as-is.
    /// Chains of references are followed; a cycle is reported as unsupported.
    pub fn deref_component<'v>(
        &self,
        section: Section,
        fragment: &'v Value,
    ) -> Result<&'v Value, ResolveError>
    where
        'a: 'v,
    {
        let mut current = fragment;
        let mut hops = 0;
        while let Some(pointer) = current.get("$ref").and_then(Value::as_str) {
            if hops > MAX_COMPONENT_HOPS {
                return Err(ResolveError::UnsupportedReference(pointer.to_string()));
            }
            current = self.lookup_component(section, pointer)?;
            hops += 1;
        }
        Ok(current)
    }
}

const MAX_COMPONENT_HOPS: usize = 32;
