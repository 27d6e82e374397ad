//! KIDL - doc-comment annotations for an interface description language
//!
//! This is the root workspace crate that provides end-to-end tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use kidl_annotations as annotations;
pub use kidl_ast as ast;
