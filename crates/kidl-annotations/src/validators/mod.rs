//! Per-kind directive validators
//!
//! Each recognized flag has one validator. A validator checks a directive
//! against its declaration, records the normalized value in the
//! declaration's `AnnotationSet`, and returns a warning for everything it
//! had to reject.
//!
//! | flag         | declarations | stored as                     |
//! |--------------|--------------|-------------------------------|
//! | `optional`   | typedef      | `optional`                    |
//! | `deprecated` | typedef, fn  | `deprecated`                  |
//! | `id`         | typedef      | `id`                          |
//! | `range`      | typedef      | `range`                       |
//! | `searchable` | typedef      | `searchable_ws_subset`        |
//! | `metadata`   | typedef      | `metadata.ws`                 |

mod deprecated;
mod id;
mod metadata;
mod optional;
mod range;
mod searchable;

pub use deprecated::{FunctionDeprecation, TypedefDeprecation};
pub use id::IdValidator;
pub use metadata::MetadataValidator;
pub use optional::OptionalFields;
pub use range::RangeValidator;
pub use searchable::SearchableValidator;

use kidl_ast::{AnnotationSet, TypeGraph, TypeId, TypeKind};

use crate::{resolve, Directive, Resolved, WarningKind};

/// A typedef being annotated
#[derive(Debug, Clone, Copy)]
pub struct TypedefContext<'g> {
    pub graph: &'g TypeGraph,
    pub id: TypeId,
    pub module: &'g str,
    pub name: &'g str,
}

impl<'g> TypedefContext<'g> {
    pub fn new(graph: &'g TypeGraph, id: TypeId, module: &'g str, name: &'g str) -> Self {
        Self {
            graph,
            id,
            module,
            name,
        }
    }

    pub fn resolve(&self) -> Result<Resolved<'g>, WarningKind> {
        Ok(resolve(self.graph, self.id)?)
    }
}

/// A funcdef being annotated
#[derive(Debug, Clone, Copy)]
pub struct FunctionContext<'a> {
    pub module: &'a str,
    pub name: &'a str,
}

/// A module being annotated
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    pub name: &'a str,
}

/// Validator for one directive flag on one kind of declaration `C`
pub trait DirectiveValidator<C> {
    /// Flag this validator handles, without the `@`
    fn flag(&self) -> &'static str;

    /// Apply `directive` to `set`, returning what was rejected
    fn validate(&self, directive: &Directive, ctx: &C, set: &mut AnnotationSet)
        -> Vec<WarningKind>;
}

/// Validators for typedef comments
pub fn typedef_validators<'g>() -> Vec<Box<dyn DirectiveValidator<TypedefContext<'g>>>> {
    vec![
        Box::new(OptionalFields),
        Box::new(TypedefDeprecation),
        Box::new(IdValidator),
        Box::new(RangeValidator),
        Box::new(SearchableValidator),
        Box::new(MetadataValidator),
    ]
}

/// Validators for funcdef comments
pub fn function_validators<'a>() -> Vec<Box<dyn DirectiveValidator<FunctionContext<'a>>>> {
    vec![Box::new(FunctionDeprecation)]
}

/// Validators for module comments; no module-level flags are defined
pub fn module_validators<'a>() -> Vec<Box<dyn DirectiveValidator<ModuleContext<'a>>>> {
    Vec::new()
}

/// `Module.name` with exactly two non-empty parts
pub(crate) fn is_qualified_name(value: &str) -> bool {
    let mut parts = value.split('.');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(module), Some(name), None) if !module.is_empty() && !name.is_empty()
    )
}

/// Resolve the typedef and require a structure, as several flags do
pub(crate) fn require_struct<'g>(ctx: &TypedefContext<'g>) -> Result<Resolved<'g>, WarningKind> {
    let resolved = ctx.resolve()?;
    match resolved.kind() {
        TypeKind::Struct { .. } => Ok(resolved),
        other => Err(WarningKind::TypeMismatch {
            expected: "a structure",
            found: other.describe(),
        }),
    }
}
