//! Global declaration index, built once after loading.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{DeclKind, DocumentationDatabase};

/// Which categories declare which names.
///
/// Turns the resolver's "is this type declared anywhere" question into map
/// lookups instead of scans over every category.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    /// Declaration key to the (sorted) keys of the categories declaring it.
    owners: HashMap<String, BTreeSet<String>>,
    /// Category key to its declarations and their kinds.
    decls: BTreeMap<String, HashMap<String, DeclKind>>,
    /// Category key to its display identifier.
    display: BTreeMap<String, String>,
}

impl TypeIndex {
    pub fn build(db: &DocumentationDatabase) -> Self {
        let mut index = TypeIndex::default();

        for (category_key, category) in &db.categories {
            index
                .display
                .insert(category_key.clone(), category.display_identifier());

            let kinds = index.decls.entry(category_key.clone()).or_default();
            for (decl_key, decl) in &category.decls {
                kinds.insert(decl_key.clone(), decl.kind);
                index
                    .owners
                    .entry(decl_key.clone())
                    .or_default()
                    .insert(category_key.clone());
            }
        }

        index
    }

    /// Kind of `name` as declared in `category`.
    pub fn kind(&self, category: &str, name: &str) -> Option<DeclKind> {
        self.decls.get(category)?.get(name).copied()
    }

    pub fn declares(&self, category: &str, name: &str) -> bool {
        self.kind(category, name).is_some()
    }

    /// The category that owns `name`.
    ///
    /// With a category hint only that category is consulted. Without one,
    /// `current` wins, then the lexicographically first declaring category.
    pub fn owner<'a>(&'a self, name: &str, hint: Option<&'a str>, current: &'a str) -> Option<&'a str> {
        match hint {
            Some(category) => self.declares(category, name).then_some(category),
            None if self.declares(current, name) => Some(current),
            None => self
                .owners
                .get(name)
                .and_then(|categories| categories.iter().next())
                .map(String::as_str),
        }
    }

    pub fn display_identifier(&self, category: &str) -> Option<&str> {
        self.display.get(category).map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.decls.len()
    }
}
