//! Doc-comment normalization.
//!
//! Scraped method documentation is loosely structured prose: paragraphs,
//! indented example code, bullet lists and ad-hoc section headers. This
//! module rebuilds it into one canonical comment in two passes:
//!
//! 1. the free-text `Parameters:` section is removed, since `@param`
//!    annotations are derived from the typed parameter list instead;
//! 2. every remaining line is classified once ([`LineKind`]) and a
//!    (previous kind, current kind) table ([`spacing_action`]) decides
//!    whether it is kept, dropped or preceded by a blank separator.
//!
//! The `options` parameter's own doc text may carry an
//! `Advanced parameters:` list, which is split out into a sub-list.
//!
//! Normalization never fails: missing prose just yields fewer lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::ident::param_identifier;
use crate::model::ParamRecord;

pub const ADVANCED_PARAMETERS_MARKER: &str = "Advanced parameters:";
const PARAMETERS_HEADER: &str = "Parameters:";
const OPTIONS_PARAM: &str = "options";

/// A leftover example invocation such as `- getRange(1, 2)`.
static RE_CALL_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*[A-Za-z_$][\w$.]*\([^)]*\)\s*;?$").unwrap());

/// Start of a new advanced-parameter entry: `name(`, `name (` or `name[]`.
static RE_NEXT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-\s+)?[A-Za-z_$][\w$.]*(?:\[\]|\s*\()").unwrap());

/// Section headers recognized in method documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Return,
    Throws,
    Authorization,
}

impl Header {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "Return:" => Some(Header::Return),
            "Throws:" => Some(Header::Throws),
            "Authorization:" => Some(Header::Authorization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Indented by four or more spaces (or a tab).
    Code,
    Section(Header),
    /// Residual example invocation; never kept.
    CallSignature,
    Prose,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if RE_CALL_SIGNATURE.is_match(trimmed) {
            return LineKind::CallSignature;
        }
        if line.starts_with("    ") || line.starts_with('\t') {
            return LineKind::Code;
        }
        match Header::parse(trimmed) {
            Some(header) => LineKind::Section(header),
            None => LineKind::Prose,
        }
    }
}

/// What the spacing pass does with one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Keep,
    Drop,
    /// Emit one blank line, then the line itself.
    SeparateThenKeep,
}

/// Decide the fate of a line of kind `cur` given the kind of the last kept
/// line (`None` at the start of the comment).
pub fn spacing_action(prev: Option<LineKind>, cur: LineKind) -> Action {
    use Header::*;
    use LineKind::*;

    match (prev, cur) {
        (_, CallSignature) => Action::Drop,

        // Blank runs collapse, and the comment never starts with one.
        (None, Blank) | (Some(Blank), Blank) => Action::Drop,

        // `Authorization:` is always followed by exactly one blank line.
        (Some(Section(Authorization)), Blank) => Action::Keep,
        (Some(Section(Authorization)), _) => Action::SeparateThenKeep,

        // Other headers hug their content.
        (Some(Section(_)), Blank) => Action::Drop,

        (Some(Prose), Code) => Action::SeparateThenKeep,
        (Some(Code) | Some(Prose) | Some(Section(_)), Section(Return | Throws)) => {
            Action::SeparateThenKeep
        }
        (Some(Code), Prose | Section(Authorization)) => Action::SeparateThenKeep,

        _ => Action::Keep,
    }
}

/// Remove a free-text `Parameters:` section and its bullets.
///
/// Deletion stops at a section header reached directly or through one blank
/// line (both are kept), or at any line that is neither blank nor a bullet.
pub fn strip_parameters_section<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim() != PARAMETERS_HEADER {
            out.push(lines[i]);
            i += 1;
            continue;
        }

        i += 1;
        while let Some(line) = lines.get(i) {
            if is_section(line) {
                break;
            }
            if line.trim().is_empty() {
                let next_is_header = lines.get(i + 1).is_some_and(|next| is_section(next));
                if next_is_header {
                    break;
                }
                i += 1;
            } else if line.trim_start().starts_with("- ") {
                i += 1;
            } else {
                break;
            }
        }
    }

    out
}

/// A header line as the spacing pass sees it; indented code never is one.
fn is_section(line: &str) -> bool {
    matches!(LineKind::classify(line), LineKind::Section(_))
}

/// Apply the spacing table to every line. Trailing blanks are trimmed.
pub fn apply_spacing(lines: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut prev = None;

    for line in lines {
        let kind = LineKind::classify(line);
        match spacing_action(prev, kind) {
            Action::Drop => continue,
            Action::Keep => {}
            Action::SeparateThenKeep => out.push(String::new()),
        }
        out.push(if kind == LineKind::Blank {
            String::new()
        } else {
            line.trim_end().to_string()
        });
        prev = Some(kind);
    }

    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    out
}

/// One `@param` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamAnnotation {
    pub name: String,
    pub description: String,
}

/// A normalized comment: description body, parameter annotations and the
/// advanced-parameter sub-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBlock {
    /// Description lines, ending with a blank line and the related URL.
    pub body: Vec<String>,
    pub params: Vec<ParamAnnotation>,
    /// Entries split out of the `options` parameter's documentation.
    pub advanced: Vec<String>,
}

impl CommentBlock {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.params.is_empty() && self.advanced.is_empty()
    }

    /// All comment lines in emission order, without comment delimiters.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.body.clone();
        for param in &self.params {
            if param.description.is_empty() {
                lines.push(format!("@param {}", param.name));
            } else {
                lines.push(format!("@param {} {}", param.name, param.description));
            }
        }
        if !self.advanced.is_empty() {
            lines.push(String::new());
            lines.push(ADVANCED_PARAMETERS_MARKER.to_string());
            for entry in &self.advanced {
                lines.push(format!("- {entry}"));
            }
        }
        lines
    }

    /// Render as a JSDoc comment, each line prefixed with `indent`.
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        out.push_str(indent);
        out.push_str("/**\n");
        for line in self.lines() {
            out.push_str(indent);
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(&line.replace("*/", "*\\/"));
                out.push('\n');
            }
        }
        out.push_str(indent);
        out.push_str(" */\n");
        out
    }
}

/// Build the canonical comment for one method (or declaration, with no
/// parameters).
pub fn normalize(raw_doc: &str, related_url: &str, params: &[ParamRecord]) -> CommentBlock {
    let raw_lines: Vec<&str> = raw_doc.lines().collect();
    let stripped = strip_parameters_section(&raw_lines);
    let mut body = apply_spacing(&stripped);

    let related_url = related_url.trim();
    if !related_url.is_empty() {
        if !body.is_empty() {
            body.push(String::new());
        }
        body.push(related_url.to_string());
    }

    let mut advanced = Vec::new();
    let params = params
        .iter()
        .map(|param| {
            let (description, entries) = split_advanced_parameters(&param.doc);
            if param.name == OPTIONS_PARAM {
                advanced.extend(entries);
            }
            ParamAnnotation {
                name: param_identifier(&param.name),
                description,
            }
        })
        .collect();

    CommentBlock {
        body,
        params,
        advanced,
    }
}

/// Split a parameter's doc text at the `Advanced parameters:` marker.
///
/// Returns the text before the marker (whitespace collapsed) and the entries
/// listed after it.
pub fn split_advanced_parameters(doc: &str) -> (String, Vec<String>) {
    match doc.split_once(ADVANCED_PARAMETERS_MARKER) {
        Some((before, after)) => (collapse_whitespace(before), split_entries(after)),
        None => (collapse_whitespace(doc), Vec::new()),
    }
}

/// Split an advanced-parameter list on semicolons that are followed by the
/// start of a new entry. Other semicolons belong to an entry's prose.
fn split_entries(list: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut start = 0;

    for (pos, _) in list.match_indices(';') {
        if RE_NEXT_ENTRY.is_match(&list[pos + 1..]) {
            entries.push(&list[start..pos]);
            start = pos + 1;
        }
    }
    entries.push(&list[start..]);

    entries
        .into_iter()
        .map(|entry| {
            let entry = entry.trim();
            let entry = entry.strip_prefix("- ").unwrap_or(entry);
            collapse_whitespace(entry)
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
