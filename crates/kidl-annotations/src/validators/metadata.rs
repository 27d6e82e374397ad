//! `@metadata ws <expression> [as <name...>]`

use kidl_ast::AnnotationSet;

use super::{require_struct, DirectiveValidator, TypedefContext};
use crate::{Directive, WarningKind};

const CONTEXT: &str = "ws";

/// Names an expression over a structure's fields for workspace metadata
pub struct MetadataValidator;

impl DirectiveValidator<TypedefContext<'_>> for MetadataValidator {
    fn flag(&self) -> &'static str {
        "metadata"
    }

    fn validate(
        &self,
        directive: &Directive,
        ctx: &TypedefContext<'_>,
        set: &mut AnnotationSet,
    ) -> Vec<WarningKind> {
        if let Err(warning) = require_struct(ctx) {
            return vec![warning];
        }

        let Some((context, tokens)) = directive.params.split_first() else {
            return vec![WarningKind::MissingParameter {
                what: "a context (ws)",
            }];
        };
        if context != CONTEXT {
            return vec![WarningKind::UnsupportedContext {
                context: context.clone(),
                expected: CONTEXT,
            }];
        }
        if tokens.is_empty() {
            return vec![WarningKind::MissingParameter {
                what: "an expression after the context",
            }];
        }

        let (expression, name) = match split_expression(tokens) {
            Ok(parts) => parts,
            Err(warning) => return vec![warning],
        };

        if set.metadata.ws.contains_key(&name) {
            return vec![WarningKind::MetadataRedefinition { name }];
        }
        set.metadata.ws.insert(name, expression);
        Vec::new()
    }
}

/// Split tokens at the first `as` that is not the leading token. The
/// expression is concatenated, the name space-joined; without `as` the
/// expression doubles as the name.
fn split_expression(tokens: &[String]) -> Result<(String, String), WarningKind> {
    let split = tokens
        .iter()
        .skip(1)
        .position(|t| t.eq_ignore_ascii_case("as"))
        .map(|i| i + 1);

    let Some(split) = split else {
        let expression = tokens.concat();
        return Ok((expression.clone(), expression));
    };

    let expression = tokens[..split].concat();
    let name = tokens[split + 1..].join(" ").trim().to_string();
    if name.is_empty() {
        return Err(WarningKind::MissingMetadataName);
    }
    Ok((expression, name))
}
