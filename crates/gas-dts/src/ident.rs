//! TypeScript identifier hygiene.

/// Words that cannot be used as a parameter name in a declaration file.
fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
    )
}

/// Check if a string is a valid TypeScript identifier (ASCII subset).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

/// The identifier a parameter is emitted under. Reserved words get a
/// trailing underscore; `@param` annotations use the same spelling.
pub fn param_identifier(name: &str) -> String {
    let name = name.trim();
    if is_reserved(name) {
        format!("{name}_")
    } else if is_valid_identifier(name) {
        name.to_string()
    } else {
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '$' { c } else { '_' })
            .collect();
        if cleaned.starts_with(|c: char| c.is_ascii_digit()) || cleaned.is_empty() {
            format!("_{cleaned}")
        } else {
            cleaned
        }
    }
}

/// A property or method name as it appears in an interface body. Member
/// names may be reserved words; anything else non-identifier is quoted.
pub fn member_name(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}
