//! The documentation database as produced by the scraper, and its loader.
//!
//! Every collection keyed by name is a `BTreeMap`, so iterating the model
//! always visits categories and declarations in lexicographic key order.
//! Generated output depends on that ordering for byte-for-byte determinism.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::error::LoadError;

/// Display name used for a category that has none.
pub const UNKNOWN_CATEGORY_NAME: &str = "UNKNOWN";

/// Root of the scraped documentation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentationDatabase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: BTreeMap<String, CategoryRecord>,
    /// Service descriptions, used only to flag entry points by URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: BTreeMap<String, ServiceRecord>,
}

impl DocumentationDatabase {
    /// Parse a database from a JSON string.
    pub fn from_json_str(src: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Read the whole stream, then parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut src = String::new();
        reader.read_to_string(&mut src)?;
        Self::from_json_str(&src)
    }

    /// Documentation URLs of every declaration exposed as a script global.
    pub fn entry_point_urls(&self) -> BTreeSet<&str> {
        self.services
            .values()
            .map(ServiceRecord::url)
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// A service entry. The scraper emits either a bare URL or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceRecord {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ServiceRecord {
    pub fn url(&self) -> &str {
        match self {
            ServiceRecord::Url(url) => url,
            ServiceRecord::Detailed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "declarations",
        deserialize_with = "null_as_default"
    )]
    pub decls: BTreeMap<String, DeclarationRecord>,
}

impl CategoryRecord {
    /// The human-readable category name, or `UNKNOWN` when missing.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_CATEGORY_NAME,
        }
    }

    /// The display name reduced to a TypeScript identifier, used as the
    /// category's namespace and as the qualifier of cross-category types.
    pub fn display_identifier(&self) -> String {
        let ident: String = self
            .display_name()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        match ident.chars().next() {
            None => UNKNOWN_CATEGORY_NAME.to_string(),
            Some(first) if first.is_ascii_digit() => format!("_{ident}"),
            Some(_) => ident,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    #[serde(alias = "class")]
    Interface,
    Enum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationRecord {
    pub kind: DeclKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<PropertyRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodRecord>,
    /// Enum member names, in declared order.
    #[serde(default, alias = "values", deserialize_with = "null_as_default")]
    pub members: Vec<String>,
}

/// A property of an interface. Parameters share the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc: String,
    /// Missing or `null` types resolve to the fallback type.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub ty: TypeReference,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deprecated: bool,
}

pub type ParamRecord = PropertyRecord;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_doc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<ParamRecord>,
    #[serde(rename = "return", default)]
    pub returns: Option<TypeReference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deprecated: bool,
}

impl MethodRecord {
    /// The long-form documentation, falling back to the summary line.
    pub fn detailed_doc(&self) -> &str {
        if self.detailed_doc.trim().is_empty() {
            &self.doc
        } else {
            &self.detailed_doc
        }
    }
}

/// A symbolic type name plus an optional owning-category hint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTypeReference")]
pub struct TypeReference {
    pub name: String,
    pub category: Option<String>,
}

impl TypeReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    pub fn in_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
        }
    }

    /// The return type of a method that declares none.
    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn is_unknown(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// An empty name: the reference carries no type information and resolves to
/// the fallback type.
impl Default for TypeReference {
    fn default() -> Self {
        Self::new("")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeReference {
    Name(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
}

impl From<RawTypeReference> for TypeReference {
    fn from(raw: RawTypeReference) -> Self {
        match raw {
            RawTypeReference::Name(name) => TypeReference::new(name),
            RawTypeReference::Full { name, category } => TypeReference {
                name: name.unwrap_or_default(),
                category: category.filter(|c| !c.is_empty()),
            },
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_database() {
        let json = r#"{
            "categories": {
                "calendar": {
                    "name": "Calendar",
                    "decls": {
                        "CalendarApp": {
                            "kind": "class",
                            "doc": "Allows a script to read and update the user's calendar.",
                            "url": "https://example.com/calendar-app",
                            "properties": [
                                { "name": "Color", "type": { "name": "Color", "category": "calendar" }, "doc": "" }
                            ],
                            "methods": [
                                {
                                    "name": "getName",
                                    "detailedDoc": "Gets the name.",
                                    "url": "https://example.com/calendar-app#getName()",
                                    "params": [],
                                    "return": { "name": "String" }
                                }
                            ]
                        },
                        "Color": { "kind": "enum", "doc": null, "members": ["BLUE", "RED"] }
                    }
                }
            },
            "services": { "calendar": "https://example.com/calendar-app" }
        }"#;

        let db = DocumentationDatabase::from_json_str(json).unwrap();
        let calendar = &db.categories["calendar"];
        assert_eq!(calendar.display_name(), "Calendar");

        let app = &calendar.decls["CalendarApp"];
        assert_eq!(app.kind, DeclKind::Interface);
        assert_eq!(
            app.properties[0].ty,
            TypeReference::in_category("Color", "calendar")
        );
        assert_eq!(
            app.methods[0].returns,
            Some(TypeReference::new("String"))
        );

        let color = &calendar.decls["Color"];
        assert_eq!(color.kind, DeclKind::Enum);
        assert_eq!(color.doc, "");
        assert_eq!(color.members, vec!["BLUE", "RED"]);

        assert!(db
            .entry_point_urls()
            .contains("https://example.com/calendar-app"));
    }

    #[test]
    fn test_missing_types_are_unknown_but_returns_stay_optional() {
        let db = DocumentationDatabase::from_json_str(
            r#"{"categories": {"c": {"decls": {"I": {"kind": "interface",
                "properties": [{"name": "p"}, {"name": "q", "type": null}],
                "methods": [{"name": "m", "params": [{"name": "x", "type": {"category": "c"}}]}]
            }}}}}"#,
        )
        .unwrap();
        let decl = &db.categories["c"].decls["I"];

        assert!(decl.properties[0].ty.is_unknown());
        assert!(decl.properties[1].ty.is_unknown());
        assert!(decl.methods[0].params[0].ty.is_unknown());
        assert_eq!(decl.methods[0].returns, None);
        assert!(!TypeReference::void().is_unknown());
    }

    #[test]
    fn test_missing_category_name_defaults_to_unknown() {
        let db = DocumentationDatabase::from_json_str(r#"{"categories": {"x": {"decls": {}}}}"#)
            .unwrap();
        let category = &db.categories["x"];
        assert_eq!(category.display_name(), "UNKNOWN");
        assert_eq!(category.display_identifier(), "UNKNOWN");
    }

    #[test]
    fn test_display_identifier_strips_non_identifier_chars() {
        let category = CategoryRecord {
            name: Some("Admin Directory".to_string()),
            decls: BTreeMap::new(),
        };
        assert_eq!(category.display_identifier(), "AdminDirectory");
    }

    #[test]
    fn test_service_record_object_form() {
        let db = DocumentationDatabase::from_json_str(
            r#"{"categories": {}, "services": {"drive": {"name": "Drive", "url": "u1"}}}"#,
        )
        .unwrap();
        assert_eq!(db.entry_point_urls().into_iter().collect::<Vec<_>>(), vec!["u1"]);
    }

    #[test]
    fn test_detailed_doc_falls_back_to_summary() {
        let db = DocumentationDatabase::from_json_str(
            r#"{"categories": {"c": {"name": "C", "decls": {"A": {"kind": "interface",
                "methods": [{"name": "m", "doc": "Summary only."}]}}}}}"#,
        )
        .unwrap();
        let method = &db.categories["c"].decls["A"].methods[0];
        assert_eq!(method.detailed_doc(), "Summary only.");
        assert!(method.returns.is_none());
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(matches!(
            DocumentationDatabase::from_json_str("{\"categories\": ["),
            Err(LoadError::Json(_))
        ));
        assert!(DocumentationDatabase::from_json_str(
            r#"{"categories": {"c": {"decls": {"A": {"kind": "struct"}}}}}"#
        )
        .is_err());
    }
}
