//! KIDL AST - Core types for the interface definition language
//!
//! This crate defines the resolved type graph produced by the front-end,
//! the function and module declarations that reference it, and the
//! annotation records attached to them by the annotation pass.

mod types;
mod decl;
mod annotation;
mod path;

pub use types::*;
pub use decl::*;
pub use annotation::*;
pub use path::*;
