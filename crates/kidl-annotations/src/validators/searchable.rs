//! `@searchable ws_subset path...`
//!
//! Each path is parsed on its own, checked against the structure, then
//! merged into the typedef's accumulated selection. A path that fails to
//! parse contributes nothing; a path that parses but does not fit the type
//! is still merged, with a warning.

use kidl_ast::{AnnotationSet, SearchableAnnotation};

use super::{require_struct, DirectiveValidator, TypedefContext};
use crate::{parse_path, strip_keys_of, validate_path, Directive, WarningKind};

const CONTEXT: &str = "ws_subset";

/// Selects the fields of a structure that are indexed for search
pub struct SearchableValidator;

impl DirectiveValidator<TypedefContext<'_>> for SearchableValidator {
    fn flag(&self) -> &'static str {
        "searchable"
    }

    fn validate(
        &self,
        directive: &Directive,
        ctx: &TypedefContext<'_>,
        set: &mut AnnotationSet,
    ) -> Vec<WarningKind> {
        let resolved = match require_struct(ctx) {
            Ok(resolved) => resolved,
            Err(warning) => return vec![warning],
        };

        let Some((context, paths)) = directive.params.split_first() else {
            return vec![WarningKind::MissingParameter {
                what: "a context (ws_subset)",
            }];
        };
        if context != CONTEXT {
            return vec![WarningKind::UnsupportedContext {
                context: context.clone(),
                expected: CONTEXT,
            }];
        }

        let searchable = set
            .searchable_ws_subset
            .get_or_insert_with(SearchableAnnotation::default);
        let mut warnings = Vec::new();

        for param in paths {
            let (expr, keys_of) = strip_keys_of(param);

            let tree = match parse_path(expr) {
                Ok(tree) => tree,
                Err(source) => {
                    warnings.push(WarningKind::PathSyntax {
                        path: param.clone(),
                        source,
                    });
                    continue;
                }
            };

            if let Err(source) = validate_path(ctx.graph, &tree, resolved.id, keys_of) {
                warnings.push(WarningKind::InvalidPath {
                    path: param.clone(),
                    source,
                });
            }

            if keys_of {
                searchable.keys.merge(tree);
            } else {
                searchable.fields.merge(tree);
            }
        }
        warnings
    }
}
