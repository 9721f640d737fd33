//! Ambient TypeScript declaration generator for the Apps Script service
//! reference.
//!
//! This crate turns a scraped documentation database (categories of
//! interfaces and enums, each carrying free-form prose) into one `.d.ts`
//! document per category:
//!
//! - [`normalize()`] rebuilds loosely structured method documentation into
//!   canonical JSDoc comments;
//! - [`Resolver`] maps scraped type names onto declared types, qualifying
//!   cross-category references and falling back to `any`;
//! - [`Generator`] walks every category in sorted order and assembles the
//!   documents.

mod config;
mod emit;
mod error;
mod ident;
mod index;
mod model;
mod normalize;
mod resolver;
mod writer;

pub use config::{
    ConflictingGlobal, DATE_PLACEHOLDER, DEFAULT_CONFIG_FILE, DEFAULT_HEADER_TEMPLATE,
    ExtendsRule, GeneratorConfig,
};
pub use emit::{Document, Generator, render_header};
pub use error::{ConfigError, LoadError, WriteError};
pub use ident::{is_valid_identifier, member_name, param_identifier};
pub use index::TypeIndex;
pub use model::{
    CategoryRecord, DeclKind, DeclarationRecord, DocumentationDatabase, MethodRecord,
    ParamRecord, PropertyRecord, ServiceRecord, TypeReference, UNKNOWN_CATEGORY_NAME,
};
pub use normalize::{
    ADVANCED_PARAMETERS_MARKER, Action, CommentBlock, Header, LineKind, ParamAnnotation,
    apply_spacing, normalize, spacing_action, split_advanced_parameters,
    strip_parameters_section,
};
pub use resolver::{Position, ResolutionContext, ResolvedType, Resolver};
pub use writer::{DirectoryWriter, DocumentSink, MemorySink, write_all};

/// Generate every category's document from a loaded database.
pub fn generate(
    db: &DocumentationDatabase,
    config: &GeneratorConfig,
    header_template: &str,
    date: &str,
) -> Vec<Document> {
    Generator::new(db, config, header_template, date).generate_all()
}
