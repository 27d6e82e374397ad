//! `@id <type> [attributes...]`
//!
//! Known id types:
//! - `kb`, `handle`: no attributes
//! - `external`: free-form attributes
//! - `ws`: attributes are the `Module.Type` names the id may point at

use kidl_ast::{AnnotationSet, IdAnnotation, ScalarKind, TypeKind};

use super::{is_qualified_name, DirectiveValidator, TypedefContext};
use crate::{Directive, WarningKind};

/// Marks a string typedef as an identifier of some other object
pub struct IdValidator;

impl DirectiveValidator<TypedefContext<'_>> for IdValidator {
    fn flag(&self) -> &'static str {
        "id"
    }

    fn validate(
        &self,
        directive: &Directive,
        ctx: &TypedefContext<'_>,
        set: &mut AnnotationSet,
    ) -> Vec<WarningKind> {
        let resolved = match ctx.resolve() {
            Ok(resolved) => resolved,
            Err(warning) => return vec![warning],
        };
        if !matches!(
            resolved.kind(),
            TypeKind::Scalar {
                scalar: ScalarKind::String
            }
        ) {
            return vec![WarningKind::TypeMismatch {
                expected: "a string",
                found: resolved.kind().describe(),
            }];
        }

        if set.id.is_some() {
            return vec![WarningKind::MultipleDeclarations];
        }

        let Some((id_type, attributes)) = directive.params.split_first() else {
            return vec![WarningKind::MissingParameter { what: "an id type" }];
        };

        let warnings = match id_type.as_str() {
            "kb" | "handle" if !attributes.is_empty() => {
                vec![WarningKind::UnexpectedAttributes {
                    id_type: id_type.clone(),
                    attributes: attributes.join(" "),
                }]
            }
            "kb" | "handle" | "external" => Vec::new(),
            "ws" => check_ws_types(attributes),
            _ => vec![WarningKind::UnknownIdType {
                id_type: id_type.clone(),
            }],
        };

        set.id = Some(IdAnnotation {
            id_type: id_type.clone(),
            attributes: attributes.to_vec(),
        });
        warnings
    }
}

/// Each attribute must be a distinct `Module.Type`
fn check_ws_types(attributes: &[String]) -> Vec<WarningKind> {
    let mut seen: Vec<&str> = Vec::new();
    let mut warnings = Vec::new();

    for value in attributes {
        if !is_qualified_name(value) {
            warnings.push(WarningKind::MalformedName {
                value: value.clone(),
                expected: "Type",
            });
        } else if seen.contains(&value.as_str()) {
            warnings.push(WarningKind::Duplicate {
                value: value.clone(),
            });
        } else {
            seen.push(value);
        }
    }
    warnings
}
