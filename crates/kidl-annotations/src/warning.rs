//! Warning records produced by the annotation pass
//!
//! Nothing in the pass is fatal. Every rejected directive becomes an
//! `AnnotationWarning`, and the assembler concatenates them into an
//! `AnnotationReport` in enumeration order.

use std::fmt;

use thiserror::Error;

use crate::{PathError, PathSyntaxError, ResolveError};

/// Prefix every warning line starts with; tooling greps for it
pub const WARNING_PREFIX: &str = "ANNOTATION WARNING";

/// The declaration a warning is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationRef {
    Module { name: String },
    Type { module: String, name: String },
    Function { module: String, name: String },
}

impl DeclarationRef {
    pub fn module(name: impl Into<String>) -> Self {
        DeclarationRef::Module { name: name.into() }
    }

    pub fn typedef(module: impl Into<String>, name: impl Into<String>) -> Self {
        DeclarationRef::Type {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn function(module: impl Into<String>, name: impl Into<String>) -> Self {
        DeclarationRef::Function {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeclarationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationRef::Module { name } => write!(f, "module {}", name),
            DeclarationRef::Type { module, name } => write!(f, "typedef {}.{}", module, name),
            DeclarationRef::Function { module, name } => write!(f, "funcdef {}.{}", module, name),
        }
    }
}

/// Why a directive (or one of its parameters) was rejected.
///
/// Messages are phrased to follow "annotation '@flag' ".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    #[error("is not recognized")]
    Unrecognized,

    #[error("can only be applied to {expected}, but the type resolves to {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error(
        "must be declared on the typedef that defines the structure, \
         not on an alias of it ({depth} typedef levels deep)"
    )]
    NotDirectStructure { depth: usize },

    #[error("refers to field '{field}', which does not exist in the structure")]
    UnknownField { field: String },

    #[error("lists '{value}' more than once")]
    Duplicate { value: String },

    #[error("has invalid reference '{value}', expected a name of the form Module.{expected}")]
    MalformedName { value: String, expected: &'static str },

    #[error("has multiple declarations; only the first declaration is used")]
    MultipleDeclarations,

    #[error("requires {what}")]
    MissingParameter { what: &'static str },

    #[error("id type '{id_type}' does not take attributes, but got '{attributes}'")]
    UnexpectedAttributes { id_type: String, attributes: String },

    #[error("has unrecognized id type '{id_type}'")]
    UnknownIdType { id_type: String },

    #[error("has invalid range '{range}': more than one ',' separator")]
    TooManyCommas { range: String },

    #[error("has no bounds in '{range}'")]
    EmptyRange { range: String },

    #[error("has unsupported context '{context}', expected '{expected}'")]
    UnsupportedContext { context: String, expected: &'static str },

    #[error("has invalid path '{path}': {source}")]
    PathSyntax {
        path: String,
        source: PathSyntaxError,
    },

    #[error("selects an invalid path '{path}': {source}")]
    InvalidPath { path: String, source: PathError },

    #[error("cannot redefine metadata name '{name}'")]
    MetadataRedefinition { name: String },

    #[error("has no metadata name after 'as'")]
    MissingMetadataName,

    #[error("cannot be checked: {0}")]
    Resolve(#[from] ResolveError),
}

/// One rejected directive on one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationWarning {
    pub flag: String,
    pub target: DeclarationRef,
    pub kind: WarningKind,
}

impl AnnotationWarning {
    pub fn new(flag: impl Into<String>, target: DeclarationRef, kind: WarningKind) -> Self {
        Self {
            flag: flag.into(),
            target,
            kind,
        }
    }
}

impl fmt::Display for AnnotationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: annotation '@{}' {}",
            WARNING_PREFIX, self.flag, self.kind
        )?;
        write!(f, "    in {}", self.target)
    }
}

/// Outcome of one run of the annotation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// All warnings, modules first, then types, then functions
    pub warnings: Vec<AnnotationWarning>,
    pub modules: usize,
    pub types: usize,
    pub functions: usize,
    /// Set from `AnnotatorConfig::ignore_warnings`
    pub suppressed: bool,
}

impl AnnotationReport {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings about one declaration
    pub fn warnings_for<'a>(
        &'a self,
        target: &'a DeclarationRef,
    ) -> impl Iterator<Item = &'a AnnotationWarning> + 'a {
        self.warnings.iter().filter(move |w| &w.target == target)
    }

    /// Every warning, one block per warning
    pub fn log(&self) -> String {
        let mut out = String::new();
        for warning in &self.warnings {
            out.push_str(&warning.to_string());
            out.push('\n');
        }
        out
    }

    /// The text to print after the pass: nothing if there were no warnings
    /// or they are suppressed, otherwise the total followed by the log
    pub fn render(&self) -> Option<String> {
        if self.suppressed || self.warnings.is_empty() {
            return None;
        }
        Some(format!(
            "total annotation warnings: {}\n{}",
            self.warnings.len(),
            self.log()
        ))
    }
}
