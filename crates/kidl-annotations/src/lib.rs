//! kidl-annotations: doc-comment annotation pass
//!
//! Runs after the type table is built and before code generation:
//! - Scan typedef, funcdef and module comments for `@flag` lines
//! - Validate each directive against the declaration it documents
//! - Store the normalized result in the declaration's `AnnotationSet`
//! - Report everything rejected as a non-fatal warning
//!
//! # Example
//!
//! ```ignore
//! use kidl_annotations::{annotate, AnnotatorConfig};
//!
//! let mut compilation: kidl_ast::Compilation = serde_json::from_str(input)?;
//! let report = annotate(&mut compilation, &AnnotatorConfig::default());
//! if let Some(log) = report.render() {
//!     eprint!("{}", log);
//! }
//! ```

mod assembler;
mod config;
mod path;
mod resolver;
mod scanner;
mod warning;
pub mod validators;

pub use assembler::Annotator;
pub use config::AnnotatorConfig;
pub use path::{parse_path, strip_keys_of, validate_path, PathError, PathSyntaxError};
pub use resolver::{resolve, ResolveError, Resolved};
pub use scanner::{scan, Directive};
pub use warning::{AnnotationReport, AnnotationWarning, DeclarationRef, WarningKind, WARNING_PREFIX};

use kidl_ast::Compilation;

/// Run the annotation pass over `compilation` with `config`
pub fn annotate(compilation: &mut Compilation, config: &AnnotatorConfig) -> AnnotationReport {
    Annotator::new(config.clone()).run(compilation)
}
