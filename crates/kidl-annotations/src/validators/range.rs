//! `@range <interval>`
//!
//! `[` and `]` are inclusive bounds, `(` and `)` exclusive. A reversed
//! bracket (`]` on the left, `[` on the right) is read as exclusive.
//! Either bound may be left empty: `(,10]`, `[0,`.

use kidl_ast::{AnnotationSet, RangeAnnotation, TypeKind};

use super::{DirectiveValidator, TypedefContext};
use crate::{Directive, WarningKind};

/// Bounds for an int or float typedef
pub struct RangeValidator;

impl DirectiveValidator<TypedefContext<'_>> for RangeValidator {
    fn flag(&self) -> &'static str {
        "range"
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
        match resolved.kind() {
            TypeKind::Scalar { scalar } if scalar.is_numeric() => {}
            other => {
                return vec![WarningKind::TypeMismatch {
                    expected: "an int or float",
                    found: other.describe(),
                }]
            }
        }

        match parse_range(&directive.params.concat()) {
            Ok(range) => {
                set.range = Some(range);
                Vec::new()
            }
            Err(warning) => vec![warning],
        }
    }
}

/// Parse an interval such as `[0,100)` into its bounds
pub fn parse_range(text: &str) -> Result<RangeAnnotation, WarningKind> {
    let (body, exclusive_minimum) = if let Some(rest) = text.strip_prefix('[') {
        (rest, false)
    } else if let Some(rest) = text.strip_prefix(['(', ']']) {
        (rest, true)
    } else {
        (text, false)
    };

    let (body, exclusive_maximum) = if let Some(rest) = body.strip_suffix(']') {
        (rest, false)
    } else if let Some(rest) = body.strip_suffix([')', '[']) {
        (rest, true)
    } else {
        (body, false)
    };

    let segments: Vec<&str> = body.split(',').collect();
    if segments.len() > 2 {
        return Err(WarningKind::TooManyCommas {
            range: text.to_string(),
        });
    }

    let bound = |index: usize| {
        segments
            .get(index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut range = RangeAnnotation::default();
    if let Some(minimum) = bound(0) {
        range.minimum = Some(minimum);
        range.exclusive_minimum = Some(exclusive_minimum);
    }
    if let Some(maximum) = bound(1) {
        range.maximum = Some(maximum);
        range.exclusive_maximum = Some(exclusive_maximum);
    }

    if range.is_empty() {
        return Err(WarningKind::EmptyRange {
            range: text.to_string(),
        });
    }
    Ok(range)
}
