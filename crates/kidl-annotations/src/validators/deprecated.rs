//! `@deprecated [replacement...]`

use kidl_ast::AnnotationSet;

use super::{is_qualified_name, DirectiveValidator, FunctionContext, TypedefContext};
use crate::{Directive, WarningKind};

/// Deprecates a typedef, optionally naming `Module.Type` replacements.
/// Replacements are de-duplicated across every `@deprecated` on the typedef.
pub struct TypedefDeprecation;

impl DirectiveValidator<TypedefContext<'_>> for TypedefDeprecation {
    fn flag(&self) -> &'static str {
        "deprecated"
    }

    fn validate(
        &self,
        directive: &Directive,
        _ctx: &TypedefContext<'_>,
        set: &mut AnnotationSet,
    ) -> Vec<WarningKind> {
        let replacements = set.deprecated.get_or_insert_with(Vec::new);
        let mut warnings = Vec::new();

        for value in &directive.params {
            if !is_qualified_name(value) {
                warnings.push(WarningKind::MalformedName {
                    value: value.clone(),
                    expected: "Type",
                });
            } else if replacements.contains(value) {
                warnings.push(WarningKind::Duplicate {
                    value: value.clone(),
                });
            } else {
                replacements.push(value.clone());
            }
        }
        warnings
    }
}

/// Deprecates a funcdef, optionally naming `Module.function` replacements.
/// Repeated replacements are kept as written.
pub struct FunctionDeprecation;

impl DirectiveValidator<FunctionContext<'_>> for FunctionDeprecation {
    fn flag(&self) -> &'static str {
        "deprecated"
    }

    fn validate(
        &self,
        directive: &Directive,
        _ctx: &FunctionContext<'_>,
        set: &mut AnnotationSet,
    ) -> Vec<WarningKind> {
        let replacements = set.deprecated.get_or_insert_with(Vec::new);
        let mut warnings = Vec::new();

        for value in &directive.params {
            if is_qualified_name(value) {
                replacements.push(value.clone());
            } else {
                warnings.push(WarningKind::MalformedName {
                    value: value.clone(),
                    expected: "function",
                });
            }
        }
        warnings
    }
}
