//! Emit one ambient declaration document per category.
//!
//! Layout of a document:
//!
//! ```text
//! <header, date substituted>
//!
//! /// <reference path="<prefix>.types.d.ts" />
//! /// <reference path="<prefix>.<other>.d.ts" />
//!
//! declare namespace <Root> {
//!   namespace <Category> {
//!     ...declarations, sorted by key...
//!   }
//! }
//!
//! declare var <EntryPoint>: <Root>.<Category>.<EntryPoint>;
//! ```

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{DATE_PLACEHOLDER, GeneratorConfig};
use crate::ident::{member_name, param_identifier};
use crate::index::TypeIndex;
use crate::model::{
    CategoryRecord, DeclKind, DeclarationRecord, DocumentationDatabase, MethodRecord,
    PropertyRecord, TypeReference,
};
use crate::normalize::normalize;
use crate::resolver::{Position, ResolutionContext, Resolver};

const DEPRECATED_TAG: &str = "/** @deprecated DO NOT USE */ ";
const NAMESPACE_SEPARATOR: char = '.';

/// A fully assembled declaration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub category: String,
    pub file_name: String,
    pub content: String,
}

/// Substitute the run date into the header template.
pub fn render_header(template: &str, date: &str) -> String {
    let mut header = template.replace(DATE_PLACEHOLDER, date);
    if !header.is_empty() && !header.ends_with('\n') {
        header.push('\n');
    }
    header
}

/// Generates documents for every category of one database.
pub struct Generator<'a> {
    db: &'a DocumentationDatabase,
    config: &'a GeneratorConfig,
    index: TypeIndex,
    entry_urls: BTreeSet<&'a str>,
    header: String,
}

impl<'a> Generator<'a> {
    pub fn new(
        db: &'a DocumentationDatabase,
        config: &'a GeneratorConfig,
        header_template: &str,
        date: &str,
    ) -> Self {
        Self {
            db,
            config,
            index: TypeIndex::build(db),
            entry_urls: db.entry_point_urls(),
            header: render_header(header_template, date),
        }
    }

    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// Every category's document, in category key order.
    pub fn generate_all(&self) -> Vec<Document> {
        self.db
            .categories
            .iter()
            .map(|(key, category)| self.generate_category(key, category))
            .collect()
    }

    pub fn generate_category(&self, key: &str, category: &CategoryRecord) -> Document {
        debug!(
            category = key,
            declarations = category.decls.len(),
            "emitting category"
        );

        let mut emitter = CategoryEmitter {
            config: self.config,
            resolver: Resolver::new(&self.index, self.config),
            key,
            namespace: category.display_identifier(),
            ctx: ResolutionContext::new(&self.config.always_referenced),
            indent: self.config.indent_str(),
            output: String::new(),
        };
        emitter.emit_namespace(category);
        let body = emitter.output;
        let bindings = self.entry_point_bindings(&emitter.namespace, category);

        let mut content = self.header.clone();
        if !content.is_empty() {
            content.push('\n');
        }
        for reference in emitter.ctx.references() {
            content.push_str(&format!(
                "/// <reference path=\"{}\" />\n",
                self.config.document_file_name(reference)
            ));
        }
        content.push('\n');
        content.push_str(&body);
        if !bindings.is_empty() {
            content.push('\n');
            content.push_str(&bindings);
        }

        Document {
            category: key.to_string(),
            file_name: self.config.document_file_name(key),
            content,
        }
    }

    /// Top-level `declare var` lines for declarations that are script
    /// globals.
    fn entry_point_bindings(&self, namespace: &str, category: &CategoryRecord) -> String {
        let mut out = String::new();
        for (key, decl) in &category.decls {
            if !self.entry_urls.contains(decl.url.as_str()) {
                continue;
            }
            let name = key.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(key);
            let binding = format!(
                "declare var {name}: {}.{namespace}.{key};",
                self.config.root_namespace
            );
            match self.config.conflicting_global(name) {
                Some(conflict) => {
                    out.push_str(&format!("// {}\n// {binding}\n", conflict.note));
                }
                None => {
                    out.push_str(&binding);
                    out.push('\n');
                }
            }
        }
        out
    }
}

struct CategoryEmitter<'a> {
    config: &'a GeneratorConfig,
    resolver: Resolver<'a>,
    key: &'a str,
    namespace: String,
    ctx: ResolutionContext,
    indent: String,
    output: String,
}

impl<'a> CategoryEmitter<'a> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.output.push_str(&self.indent);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn emit_namespace(&mut self, category: &CategoryRecord) {
        self.line(0, &format!("declare namespace {} {{", self.config.root_namespace));
        self.line(1, &format!("namespace {} {{", self.namespace));

        for (key, decl) in &category.decls {
            let mut segments: Vec<&str> = key.split(NAMESPACE_SEPARATOR).collect();
            let name = segments.pop().unwrap_or(key.as_str());

            let mut depth = 2;
            for segment in &segments {
                self.line(depth, &format!("namespace {segment} {{"));
                depth += 1;
            }
            self.emit_declaration(depth, key, name, decl);
            for _ in &segments {
                depth -= 1;
                self.line(depth, "}");
            }
        }

        self.line(1, "}");
        self.line(0, "}");
    }

    fn emit_declaration(&mut self, depth: usize, key: &str, name: &str, decl: &DeclarationRecord) {
        let comment = normalize(&decl.doc, &decl.url, &[]);
        if !comment.is_empty() {
            let indent = self.indent.repeat(depth);
            self.output.push_str(&comment.render(&indent));
        }

        match decl.kind {
            DeclKind::Enum => {
                let members: Vec<String> = decl.members.iter().map(|m| member_name(m)).collect();
                if members.is_empty() {
                    self.line(depth, &format!("enum {name} {{}}"));
                } else {
                    self.line(depth, &format!("enum {name} {{ {} }}", members.join(", ")));
                }
            }
            DeclKind::Interface => {
                let heading = match self.extends_clause(key) {
                    Some(base) => format!("interface {name} extends {base} {{"),
                    None => format!("interface {name} {{"),
                };
                self.line(depth, &heading);
                for property in &decl.properties {
                    self.emit_property(depth + 1, property);
                }
                for method in &decl.methods {
                    self.emit_method(depth + 1, method);
                }
                self.line(depth, "}");
            }
        }
    }

    /// The base of a configured `extends` rule, if the base exists.
    fn extends_clause(&mut self, key: &str) -> Option<String> {
        let rule = self.config.extends_rule(self.key, key)?;
        let hint = rule.base_category.as_deref();
        match self.resolver.lookup(&rule.base, hint, self.key) {
            Some(owner) => Some(self.resolver.qualify(&rule.base, owner, self.key, &mut self.ctx)),
            None => {
                debug!(
                    category = self.key,
                    interface = key,
                    base = %rule.base,
                    "extends base not declared, emitting standalone interface"
                );
                None
            }
        }
    }

    fn emit_property(&mut self, depth: usize, property: &PropertyRecord) {
        let ty = self
            .resolver
            .resolve(&property.ty, self.key, Position::Property, &mut self.ctx);
        let tag = if property.deprecated { DEPRECATED_TAG } else { "" };
        self.line(
            depth,
            &format!("{tag}{}: {};", member_name(&property.name), ty.ty),
        );
    }

    fn emit_method(&mut self, depth: usize, method: &MethodRecord) {
        if !method.deprecated {
            let comment = normalize(method.detailed_doc(), &method.url, &method.params);
            if !comment.is_empty() {
                let indent = self.indent.repeat(depth);
                self.output.push_str(&comment.render(&indent));
            }
        }

        let params: Vec<String> = method
            .params
            .iter()
            .map(|param| {
                let resolved = self
                    .resolver
                    .resolve(&param.ty, self.key, Position::Parameter, &mut self.ctx);
                let spread = if resolved.rest { "..." } else { "" };
                format!("{spread}{}: {}", param_identifier(&param.name), resolved.ty)
            })
            .collect();

        let void = TypeReference::void();
        let returns = method.returns.as_ref().unwrap_or(&void);
        let ret = self
            .resolver
            .resolve(returns, self.key, Position::Return, &mut self.ctx);

        let tag = if method.deprecated { DEPRECATED_TAG } else { "" };
        self.line(
            depth,
            &format!(
                "{tag}{}({}): {};",
                member_name(&method.name),
                params.join(", "),
                ret.ty
            ),
        );
    }
}
