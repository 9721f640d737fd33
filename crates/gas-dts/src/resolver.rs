//! Type reference resolution.
//!
//! Decides how a scraped type name is spelled in the generated document:
//! a primitive, a same-category declaration, a qualified cross-category
//! declaration, or the fallback type when nothing matches. Resolution is
//! total and silent; an unresolvable name never reaches the output.

use indexmap::IndexSet;
use tracing::trace;

use crate::config::GeneratorConfig;
use crate::index::TypeIndex;
use crate::model::{DeclKind, TypeReference};

const ARRAY_SUFFIX: &str = "[]";
const REST_SUFFIX: &str = "...";

/// Where a type reference appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Property,
    Parameter,
    Return,
}

/// A type reference as it is written into a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub ty: String,
    /// The reference used the `Name...` convention; the parameter carrying it
    /// is emitted as a rest parameter.
    pub rest: bool,
}

/// Categories referenced while emitting one category, in first-seen order.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    references: IndexSet<String>,
}

impl ResolutionContext {
    /// A context already referencing the always-available category.
    pub fn new(always_referenced: &str) -> Self {
        let mut references = IndexSet::new();
        references.insert(always_referenced.to_string());
        Self { references }
    }

    /// Record a referenced category. Later duplicates keep the first position.
    pub fn record(&mut self, category: &str) {
        // `insert` keeps the first position on its own; the check only skips
        // allocating a key for a repeat.
        if !self.references.contains(category) {
            self.references.insert(category.to_string());
        }
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

pub struct Resolver<'a> {
    index: &'a TypeIndex,
    config: &'a GeneratorConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a TypeIndex, config: &'a GeneratorConfig) -> Self {
        Self { index, config }
    }

    /// Resolve `reference` as seen from category `current`.
    pub fn resolve(
        &self,
        reference: &TypeReference,
        current: &str,
        position: Position,
        ctx: &mut ResolutionContext,
    ) -> ResolvedType {
        let name = reference.name.trim();
        let (name, rest) = match name.strip_suffix(REST_SUFFIX) {
            Some(element) => (format!("{}{ARRAY_SUFFIX}", element.trim_end()), true),
            None => (name.to_string(), false),
        };

        let (base, dims) = split_array_suffix(&name);
        let hint = reference.category.as_deref();
        let base_ty = if self.config.is_blacklisted(&name) {
            trace!(name = %name, "blacklisted type rewritten to fallback");
            self.config.fallback_type.clone()
        } else {
            self.resolve_base(base, hint, current, position, dims, ctx)
        };

        ResolvedType {
            ty: format!("{base_ty}{}", ARRAY_SUFFIX.repeat(dims)),
            rest,
        }
    }

    fn resolve_base(
        &self,
        base: &str,
        hint: Option<&str>,
        current: &str,
        position: Position,
        dims: usize,
        ctx: &mut ResolutionContext,
    ) -> String {
        let fallback = &self.config.fallback_type;

        if base.is_empty() || base == self.config.host_object_type || self.config.is_blacklisted(base) {
            trace!(name = base, "host object or blacklisted type rewritten to fallback");
            return fallback.clone();
        }
        if let Some(primitive) = self.config.primitive(base) {
            return primitive.to_string();
        }
        if base == fallback {
            return fallback.clone();
        }

        let Some(owner) = self.index.owner(base, hint, current) else {
            trace!(name = base, category = ?hint, "unresolved type replaced by fallback");
            return fallback.clone();
        };

        let qualified = self.qualify(base, owner, current, ctx);
        let is_enum = self.index.kind(owner, base) == Some(DeclKind::Enum);
        if is_enum && position == Position::Property && dims == 0 {
            format!("typeof {qualified}")
        } else {
            qualified
        }
    }

    /// Look up the category owning `name` without any fallback.
    pub fn lookup(&self, name: &str, hint: Option<&'a str>, current: &'a str) -> Option<&'a str> {
        self.index.owner(name, hint, current)
    }

    /// Spell `name` (owned by `owner`) as seen from `current`, recording the
    /// cross-reference when the two differ.
    pub fn qualify(&self, name: &str, owner: &str, current: &str, ctx: &mut ResolutionContext) -> String {
        if owner == current {
            return name.to_string();
        }
        ctx.record(owner);
        let qualifier = self.index.display_identifier(owner).unwrap_or(owner);
        format!("{qualifier}.{name}")
    }
}

/// Strip every trailing `[]`, returning the element name and the depth.
fn split_array_suffix(name: &str) -> (&str, usize) {
    let mut base = name;
    let mut dims = 0;
    while let Some(inner) = base.strip_suffix(ARRAY_SUFFIX) {
        base = inner.trim_end();
        dims += 1;
    }
    (base, dims)
}
