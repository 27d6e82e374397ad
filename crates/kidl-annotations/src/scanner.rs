//! Directive extraction from doc comments
//!
//! A directive is any comment line that starts with `@` once trimmed:
//!
//! ```text
//! A genome feature.
//! @optional aliases notes
//! @searchable ws_subset id keys_of(aliases)
//! ```

/// One `@flag param...` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub flag: String,
    pub params: Vec<String>,
    /// The line with `@flag` removed, trimmed
    pub body: String,
}

impl Directive {
    /// Parse a single comment line. Returns None if not a directive.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix('@')?.trim_start();
        let flag = rest.split_whitespace().next()?;
        let body = rest[flag.len()..].trim();

        Some(Self {
            flag: flag.to_string(),
            params: body.split_whitespace().map(String::from).collect(),
            body: body.to_string(),
        })
    }
}

/// All directives in a comment, in order
pub fn scan(comment: &str) -> Vec<Directive> {
    comment.lines().filter_map(Directive::parse).collect()
}
