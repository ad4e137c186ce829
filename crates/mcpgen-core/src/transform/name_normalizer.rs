use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToPascalCase};

/// Service identifier derived from the document title: `"Pet Store API"` →
/// `petStoreApi`.
pub fn service_id(title: &str) -> String {
    sanitize_identifier(title).to_lower_camel_case()
}

/// PascalCase a single naming piece (schema name, property, operationId).
pub fn type_name(piece: &str) -> String {
    sanitize_identifier(piece).to_pascal_case()
}

/// Join naming pieces into a PascalCase context name:
/// `["Pet", "owner_id"]` → `PetOwnerId`.
pub fn context_name(pieces: &[&str]) -> String {
    pieces.iter().map(|p| type_name(p)).collect()
}

/// Names handed out to types during one transform run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name taken without renaming it.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
        self.used.insert(type_name(name));
    }

    /// `base` if free, else `base2`, `base3`, ...
    pub fn unique(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut i = 2;
        loop {
            let candidate = format!("{base}{i}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }
}

/// Reduce a string to alphanumeric words joined by `_`.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
