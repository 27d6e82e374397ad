//! `@optional field...`

use kidl_ast::AnnotationSet;

use super::{require_struct, DirectiveValidator, TypedefContext};
use crate::{Directive, WarningKind};

/// Marks structure fields as optional. Only valid directly on the typedef
/// that introduces the structure.
pub struct OptionalFields;

impl DirectiveValidator<TypedefContext<'_>> for OptionalFields {
    fn flag(&self) -> &'static str {
        "optional"
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
        if resolved.depth != 1 {
            return vec![WarningKind::NotDirectStructure {
                depth: resolved.depth,
            }];
        }

        let mut warnings = Vec::new();
        for name in &directive.params {
            if resolved.kind().field(name).is_none() {
                warnings.push(WarningKind::UnknownField {
                    field: name.clone(),
                });
            } else if set.optional.contains(name) {
                warnings.push(WarningKind::Duplicate {
                    value: name.clone(),
                });
            } else {
                set.optional.push(name.clone());
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::{run, Fixture};

    #[test]
    fn test_fields_recorded_in_order() {
        let fixture = Fixture::new();
        let (set, warnings) = run(&OptionalFields, &fixture, "Thing", &["@optional a b"]);
        assert_eq!(set.optional, vec!["a", "b"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_alias_of_struct_is_rejected() {
        let fixture = Fixture::new();
        let (set, warnings) = run(&OptionalFields, &fixture, "Alias", &["@optional a b"]);
        assert!(set.optional.is_empty());
        assert_eq!(warnings, vec![WarningKind::NotDirectStructure { depth: 2 }]);
    }

    #[test]
    fn test_unknown_field_skipped() {
        let fixture = Fixture::new();
        let (set, warnings) = run(&OptionalFields, &fixture, "Thing", &["@optional a z c"]);
        assert_eq!(set.optional, vec!["a", "c"]);
        assert_eq!(
            warnings,
            vec![WarningKind::UnknownField { field: "z".into() }]
        );
    }

    #[test]
    fn test_duplicates_within_and_across_directives() {
        let fixture = Fixture::new();
        let (set, warnings) = run(
            &OptionalFields,
            &fixture,
            "Thing",
            &["@optional a a", "@optional b a"],
        );
        assert_eq!(set.optional, vec!["a", "b"]);
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| *w == WarningKind::Duplicate { value: "a".into() }));
    }

    #[test]
    fn test_non_struct_rejected() {
        let fixture = Fixture::new();
        let (set, warnings) = run(&OptionalFields, &fixture, "Ints", &["@optional a"]);
        assert!(set.optional.is_empty());
        assert_eq!(
            warnings,
            vec![WarningKind::TypeMismatch {
                expected: "a structure",
                found: "list".into()
            }]
        );
    }
}
