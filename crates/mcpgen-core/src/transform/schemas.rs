use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::error::TransformError;
use crate::ir::{Constraints, ScalarType, Type, TypeId, TypeKind, TypeRef};
use crate::parse::Dialect;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::schema::{SchemaFacets, SchemaOrRef, SchemaType, TypeSet, branches, properties};

use super::identity::stable_id;
use super::name_normalizer::{NameRegistry, context_name};

/// Turns schema fragments into IR types and hands out `TypeRef`s to them.
///
/// Named definitions are registered first, in document order; inline
/// fragments reached while walking them (or later, from parameters, bodies
/// and responses) follow in discovery order. Each id is emitted once.
pub struct SchemaTransformer<'a> {
    resolver: RefResolver<'a>,
    named: IndexMap<TypeId, Option<Type>>,
    anonymous: IndexMap<TypeId, Option<Type>>,
    aliases: HashMap<TypeId, Vec<String>>,
    names: NameRegistry,
}

impl<'a> SchemaTransformer<'a> {
    pub fn new(resolver: RefResolver<'a>) -> Self {
        Self {
            resolver,
            named: IndexMap::new(),
            anonymous: IndexMap::new(),
            aliases: HashMap::new(),
            names: NameRegistry::new(),
        }
    }

    /// Transform every named definition of the document.
    pub fn transform_definitions(
        &mut self,
        definitions: Option<&'a serde_json::Map<String, Value>>,
    ) -> Result<(), TransformError> {
        let Some(definitions) = definitions else {
            return Ok(());
        };
        let section = match self.resolver.dialect() {
            Dialect::V2 => "definitions",
            Dialect::V3 => "components.schemas",
        };

        // Reserve ids and names up front so inline fragments equal to a named
        // definition resolve to it and anonymous names never shadow it.
        let mut first_seen = Vec::new();
        for (name, fragment) in definitions {
            let id = stable_id(fragment);
            self.names.reserve(name);
            if self.named.contains_key(&id) {
                debug!("definition {name} aliases an earlier definition");
                self.aliases.entry(id).or_default().push(name.clone());
                continue;
            }
            self.named.insert(id.clone(), None);
            first_seen.push((name, id, fragment));
        }

        for (name, id, fragment) in first_seen {
            let at = format!("{section}.{name}");
            let facets = SchemaFacets::read(fragment, &at)?;
            let mut ty = self.build_type(id.clone(), name.clone(), fragment, &facets, &at)?;
            ty.aliases = self.aliases.remove(&id).unwrap_or_default();
            debug!("type {} ({})", ty.name, ty.kind.as_str());
            self.named.insert(id, Some(ty));
        }
        Ok(())
    }

    /// Resolve a fragment to a `TypeRef`, registering inline fragments as
    /// anonymous types named after `context`.
    pub fn type_ref(
        &mut self,
        fragment: &Value,
        context: &str,
        at: &str,
    ) -> Result<TypeRef, TransformError> {
        match SchemaOrRef::classify(fragment) {
            SchemaOrRef::Ref(pointer) => {
                let (name, target) = self.resolver.lookup_schema(pointer)?;
                let target_facets = SchemaFacets::read(target, &name)?;
                let nullable = flag(fragment, "nullable")
                    || flag(fragment, "x-nullable")
                    || target_facets.is_nullable();
                Ok(TypeRef::new(stable_id(target)).with_nullable(nullable))
            }
            SchemaOrRef::Inline(fragment) => {
                let facets = SchemaFacets::read(fragment, at)?;
                let id = stable_id(fragment);
                if !self.contains(&id) {
                    let name = self.names.unique(context);
                    self.anonymous.insert(id.clone(), None);
                    let ty = self.build_type(id.clone(), name, fragment, &facets, at)?;
                    debug!("anonymous type {} ({})", ty.name, ty.kind.as_str());
                    self.anonymous.insert(id.clone(), Some(ty));
                }
                Ok(TypeRef::new(id).with_nullable(facets.is_nullable()))
            }
        }
    }

    /// A type registered so far, if it has been fully built.
    pub fn get(&self, id: &str) -> Option<&Type> {
        self.named
            .get(id)
            .or_else(|| self.anonymous.get(id))
            .and_then(Option::as_ref)
    }

    /// All types: named definitions first, then anonymous ones.
    pub fn finish(self) -> Vec<Type> {
        self.named
            .into_values()
            .chain(self.anonymous.into_values())
            .flatten()
            .collect()
    }

    fn contains(&self, id: &str) -> bool {
        self.named.contains_key(id) || self.anonymous.contains_key(id)
    }

    fn build_type(
        &mut self,
        id: TypeId,
        name: String,
        fragment: &Value,
        facets: &SchemaFacets,
        at: &str,
    ) -> Result<Type, TransformError> {
        let (kind, scalar) = classify(fragment, facets);
        let mut ty = Type {
            id,
            name,
            kind,
            description: facets.description.clone(),
            scalar,
            format: facets.format.clone(),
            properties: IndexMap::new(),
            required: facets.required.clone(),
            items: None,
            additional_properties: None,
            enum_values: facets.enum_values.clone(),
            one_of: Vec::new(),
            all_of: Vec::new(),
            constraints: constraints(facets),
            aliases: Vec::new(),
        };
        let base = ty.name.clone();

        if let Some(props) = properties(fragment) {
            for (prop, sub) in props {
                let context = context_name(&[base.as_str(), prop.as_str()]);
                let r = self.type_ref(sub, &context, &format!("{at}.properties.{prop}"))?;
                ty.properties.insert(prop.clone(), r);
            }
        }

        if let Some(items) = fragment.get("items") {
            let context = context_name(&[base.as_str(), "Item"]);
            ty.items = Some(self.type_ref(items, &context, &format!("{at}.items"))?);
        }

        if let Some(extra) = fragment.get("additionalProperties").filter(|v| v.is_object()) {
            let context = context_name(&[base.as_str(), "Value"]);
            let at = format!("{at}.additionalProperties");
            ty.additional_properties = Some(self.type_ref(extra, &context, &at)?);
        }

        match kind {
            TypeKind::OneOf => {
                let keyword = if fragment.get("oneOf").is_some() { "oneOf" } else { "anyOf" };
                ty.one_of = self.branch_refs(fragment, keyword, &base, at)?;
            }
            TypeKind::AllOf if fragment.get("allOf").is_some() => {
                ty.all_of = self.branch_refs(fragment, "allOf", &base, at)?;
            }
            TypeKind::AllOf => {
                // Bare `$ref` definition: one branch pointing at the target.
                ty.all_of = vec![self.type_ref(fragment, &base, at)?];
            }
            _ => {}
        }

        Ok(ty)
    }

    fn branch_refs(
        &mut self,
        fragment: &Value,
        keyword: &str,
        base: &str,
        at: &str,
    ) -> Result<Vec<TypeRef>, TransformError> {
        branches(fragment, keyword)
            .iter()
            .enumerate()
            .map(|(i, branch)| {
                let context = format!("{}Variant{}", context_name(&[base]), i + 1);
                self.type_ref(branch, &context, &format!("{at}.{keyword}[{i}]"))
            })
            .collect()
    }
}

fn flag(fragment: &Value, key: &str) -> bool {
    fragment.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// The type a fragment declares. A type list with several non-null members
/// is classified by its first one.
fn declared_type(facets: &SchemaFacets) -> Option<SchemaType> {
    facets.primary_type().or_else(|| match &facets.schema_type {
        Some(TypeSet::Multiple(types)) => types.iter().copied().find(|t| *t != SchemaType::Null),
        _ => None,
    })
}

fn scalar_of(schema_type: SchemaType) -> Option<ScalarType> {
    match schema_type {
        SchemaType::String => Some(ScalarType::String),
        SchemaType::Integer => Some(ScalarType::Integer),
        SchemaType::Number => Some(ScalarType::Number),
        SchemaType::Boolean => Some(ScalarType::Boolean),
        SchemaType::Null => Some(ScalarType::Null),
        SchemaType::File => Some(ScalarType::File),
        SchemaType::Array | SchemaType::Object => None,
    }
}

/// `true` admits any value and classifies as an open object; `false` admits
/// none and becomes an enum without members.
fn classify(fragment: &Value, facets: &SchemaFacets) -> (TypeKind, Option<ScalarType>) {
    if fragment == &Value::Bool(false) {
        return (TypeKind::Enum, None);
    }
    let declared = declared_type(facets);
    if fragment.get("oneOf").is_some() || fragment.get("anyOf").is_some() {
        return (TypeKind::OneOf, None);
    }
    if fragment.get("allOf").is_some() || fragment.get("$ref").is_some() {
        return (TypeKind::AllOf, None);
    }
    if !facets.enum_values.is_empty() {
        return (TypeKind::Enum, declared.and_then(scalar_of));
    }
    match declared {
        Some(SchemaType::Array) => (TypeKind::Array, None),
        Some(SchemaType::Object) | None => (TypeKind::Object, None),
        Some(scalar) => (TypeKind::Primitive, scalar_of(scalar)),
    }
}

fn constraints(facets: &SchemaFacets) -> Option<Constraints> {
    let c = Constraints {
        min_length: facets.min_length,
        max_length: facets.max_length,
        minimum: facets.minimum,
        maximum: facets.maximum,
        pattern: facets.pattern.clone(),
    };
    (!c.is_empty()).then_some(c)
}
