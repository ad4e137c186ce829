use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::schemas::TypeKind;
use super::types::Ir;

/// Which kind of IR entity a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Type,
    Operation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Type => write!(f, "type"),
            EntityKind::Operation => write!(f, "operation"),
        }
    }
}

/// A single integrity violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub entity: EntityKind,
    pub id: String,
    pub message: String,
}

impl Finding {
    fn new(entity: EntityKind, id: &str, message: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.entity, short_id(&self.id), self.message)
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

/// Run every integrity check over a finished IR. An empty result means the
/// document is referentially consistent.
pub fn check(ir: &Ir) -> Vec<Finding> {
    let mut findings = Vec::new();
    check_duplicate_types(ir, &mut findings);
    check_type_refs(ir, &mut findings);
    check_required_subset(ir, &mut findings);
    check_duplicate_operations(ir, &mut findings);
    findings
}

fn check_duplicate_types(ir: &Ir, findings: &mut Vec<Finding>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for ty in &ir.types {
        if !seen.insert(ty.id.as_str()) {
            findings.push(Finding::new(
                EntityKind::Type,
                &ty.id,
                format!("duplicate type id (type `{}`)", ty.name),
            ));
        }
    }
}

fn check_type_refs(ir: &Ir, findings: &mut Vec<Finding>) {
    let known: HashSet<&str> = ir.types.iter().map(|t| t.id.as_str()).collect();

    for ty in &ir.types {
        for r in ty.type_refs() {
            if !known.contains(r.type_id.as_str()) {
                findings.push(Finding::new(
                    EntityKind::Type,
                    &ty.id,
                    format!(
                        "type `{}` references unknown type id {}",
                        ty.name,
                        short_id(&r.type_id)
                    ),
                ));
            }
        }
    }

    for op in &ir.operations {
        for r in op.type_refs() {
            if !known.contains(r.type_id.as_str()) {
                findings.push(Finding::new(
                    EntityKind::Operation,
                    &op.id,
                    format!(
                        "operation `{}` references unknown type id {}",
                        op.name,
                        short_id(&r.type_id)
                    ),
                ));
            }
        }
    }
}

fn check_required_subset(ir: &Ir, findings: &mut Vec<Finding>) {
    for ty in ir.types.iter().filter(|t| t.kind == TypeKind::Object) {
        for name in &ty.required {
            if !ty.properties.contains_key(name) {
                findings.push(Finding::new(
                    EntityKind::Type,
                    &ty.id,
                    format!(
                        "type `{}` requires `{name}` which is not a declared property",
                        ty.name
                    ),
                ));
            }
        }
    }
}

fn check_duplicate_operations(ir: &Ir, findings: &mut Vec<Finding>) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for op in &ir.operations {
        if let Some(first) = seen.insert(op.id.as_str(), op.name.as_str()) {
            findings.push(Finding::new(
                EntityKind::Operation,
                &op.id,
                format!(
                    "operation `{}` has the same id as `{first}`",
                    op.name
                ),
            ));
        }
    }
}
