//! Generator configuration (`gas-dts.toml`).
//!
//! All naming and resolution policy lives here as plain lookup tables so the
//! traversal code in `resolver` and `emit` never hard-codes a type name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Token in the header template replaced by the run date.
pub const DATE_PLACEHOLDER: &str = "{{date}}";

/// Boilerplate placed at the top of every generated document.
pub const DEFAULT_HEADER_TEMPLATE: &str = "\
// Type definitions for Google Apps Script {{date}}
// Project: https://developers.google.com/apps-script/
// Definitions: https://github.com/DefinitelyTyped/DefinitelyTyped
";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gas-dts.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Outermost namespace wrapping every category.
    pub root_namespace: String,
    /// File name prefix: documents are named `<prefix>.<category>.d.ts`.
    pub file_prefix: String,
    /// Category every document references, whether or not it is used.
    pub always_referenced: String,
    /// Type substituted for anything that cannot be resolved.
    pub fallback_type: String,
    /// Generic host-object type name, always rewritten to the fallback.
    pub host_object_type: String,
    /// Type names whose documentation is unreliable; always rewritten to the
    /// fallback.
    pub blacklist: Vec<String>,
    /// Optional path to a header template replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_template: Option<PathBuf>,
    /// Spaces per nesting level in generated documents.
    pub indent_size: usize,
    /// Source type name to emitted type name. These always resolve.
    pub primitives: BTreeMap<String, String>,
    /// Interfaces declared as extending a shared base.
    pub extends: Vec<ExtendsRule>,
    /// Entry points whose global binding is emitted commented out.
    pub conflicting_globals: Vec<ConflictingGlobal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendsRule {
    pub category: String,
    pub name: String,
    pub base: String,
    /// Category owning `base`; the interface's own category when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingGlobal {
    pub name: String,
    pub note: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let primitives = [
            ("String", "string"),
            ("string", "string"),
            ("Number", "number"),
            ("number", "number"),
            ("Boolean", "boolean"),
            ("boolean", "boolean"),
            ("Integer", "Integer"),
            ("Byte", "Byte"),
            ("Char", "Char"),
            ("Date", "Date"),
            ("Function", "Function"),
            ("void", "void"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let element = |name: &str| ExtendsRule {
            category: "document".to_string(),
            name: name.to_string(),
            base: "Element".to_string(),
            base_category: None,
        };

        Self {
            root_namespace: "GoogleAppsScript".to_string(),
            file_prefix: "google-apps-script".to_string(),
            always_referenced: "types".to_string(),
            fallback_type: "any".to_string(),
            host_object_type: "Object".to_string(),
            blacklist: vec!["JavaScriptObject".to_string(), "JsonObject".to_string()],
            header_template: None,
            indent_size: 2,
            primitives,
            extends: vec![
                ExtendsRule {
                    category: "base".to_string(),
                    name: "Blob".to_string(),
                    base: "BlobSource".to_string(),
                    base_category: None,
                },
                ExtendsRule {
                    category: "gmail".to_string(),
                    name: "GmailAttachment".to_string(),
                    base: "Blob".to_string(),
                    base_category: Some("base".to_string()),
                },
                element("Body"),
                element("Paragraph"),
                element("Table"),
                element("Text"),
            ],
            conflicting_globals: vec![ConflictingGlobal {
                name: "console".to_string(),
                note: "conflicts with the console declared by lib.dom.d.ts".to_string(),
            }],
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from a TOML string. Missing keys keep their
    /// defaults.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `gas-dts.toml` from `dir` when present, defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize the configuration, e.g. to print the defaults.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// The header template text: the configured file, or the built-in one.
    pub fn header_template_text(&self) -> Result<String, ConfigError> {
        match &self.header_template {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::HeaderTemplate {
                path: path.clone(),
                source,
            }),
            None => Ok(DEFAULT_HEADER_TEMPLATE.to_string()),
        }
    }

    pub fn primitive(&self, name: &str) -> Option<&str> {
        self.primitives.get(name).map(String::as_str)
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.iter().any(|b| b == name)
    }

    pub fn extends_rule(&self, category: &str, name: &str) -> Option<&ExtendsRule> {
        self.extends
            .iter()
            .find(|rule| rule.category == category && rule.name == name)
    }

    pub fn conflicting_global(&self, name: &str) -> Option<&ConflictingGlobal> {
        self.conflicting_globals.iter().find(|c| c.name == name)
    }

    /// File name of the document generated for `category_key`.
    pub fn document_file_name(&self, category_key: &str) -> String {
        format!("{}.{}.d.ts", self.file_prefix, category_key)
    }

    pub fn indent_str(&self) -> String {
        " ".repeat(self.indent_size)
    }
}
