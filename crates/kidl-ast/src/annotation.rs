//! Annotation records attached to declarations by the annotation pass
//!
//! Downstream generators read these fields directly; the serialized field
//! names are part of the contract with them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PathTree;

/// `@id <type> [attributes...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAnnotation {
    #[serde(rename = "type")]
    pub id_type: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// `@range` bounds; a bound and its exclusivity flag are present together or not at all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
}

impl RangeAnnotation {
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }
}

/// `@searchable ws_subset ...` selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableAnnotation {
    /// Plain field selections
    #[serde(default)]
    pub fields: PathTree,
    /// `keys_of(...)` selections
    #[serde(default)]
    pub keys: PathTree,
}

/// `@metadata <context> ...` tables, keyed by context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAnnotation {
    /// metadata name -> expression
    #[serde(default)]
    pub ws: BTreeMap<String, String>,
}

impl MetadataAnnotation {
    pub fn is_empty(&self) -> bool {
        self.ws.is_empty()
    }
}

/// Normalized outcome of every directive found on one declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,

    /// `Some(vec![])` means deprecated without a named replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdAnnotation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeAnnotation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable_ws_subset: Option<SearchableAnnotation>,

    #[serde(default, skip_serializing_if = "MetadataAnnotation::is_empty")]
    pub metadata: MetadataAnnotation,

    /// Unrecognized flag -> directive bodies, in the order they appeared
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unknown: BTreeMap<String, Vec<String>>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.optional.is_empty()
            && self.deprecated.is_none()
            && self.id.is_none()
            && self.range.is_none()
            && self.searchable_ws_subset.is_none()
            && self.metadata.is_empty()
            && self.unknown.is_empty()
    }

    /// Record an unrecognized directive body under its flag
    pub fn push_unknown(&mut self, flag: impl Into<String>, body: impl Into<String>) {
        self.unknown.entry(flag.into()).or_default().push(body.into());
    }

    /// Fold another set into this one. Existing `id` values and metadata
    /// names win; `range` is replaced; lists and trees accumulate.
    pub fn merge(&mut self, other: AnnotationSet) {
        for name in other.optional {
            if !self.optional.contains(&name) {
                self.optional.push(name);
            }
        }

        if let Some(replacements) = other.deprecated {
            self.deprecated
                .get_or_insert_with(Vec::new)
                .extend(replacements);
        }

        if self.id.is_none() {
            self.id = other.id;
        }

        if other.range.is_some() {
            self.range = other.range;
        }

        if let Some(searchable) = other.searchable_ws_subset {
            let current = self.searchable_ws_subset.get_or_insert_with(Default::default);
            current.fields.merge(searchable.fields);
            current.keys.merge(searchable.keys);
        }

        for (name, expr) in other.metadata.ws {
            self.metadata.ws.entry(name).or_insert(expr);
        }

        for (flag, bodies) in other.unknown {
            self.unknown.entry(flag).or_default().extend(bodies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_serializes_to_empty_object() {
        let json = serde_json::to_string(&AnnotationSet::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_range_omits_missing_bounds() {
        let range = RangeAnnotation {
            maximum: Some("10".into()),
            exclusive_maximum: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json, serde_json::json!({"maximum": "10", "exclusiveMaximum": false}));
    }

    #[test]
    fn test_merge_keeps_first_id_and_metadata_name() {
        let mut base = AnnotationSet::new();
        base.id = Some(IdAnnotation {
            id_type: "kb".into(),
            attributes: vec![],
        });
        base.metadata.ws.insert("size".into(), "length(a)".into());

        let mut other = AnnotationSet::new();
        other.id = Some(IdAnnotation {
            id_type: "ws".into(),
            attributes: vec![],
        });
        other.metadata.ws.insert("size".into(), "length(b)".into());
        other.optional.push("x".into());

        base.merge(other);
        assert_eq!(base.id.as_ref().unwrap().id_type, "kb");
        assert_eq!(base.metadata.ws["size"], "length(a)");
        assert_eq!(base.optional, vec!["x"]);
    }

    #[test]
    fn test_merge_deprecated_without_replacements() {
        let mut base = AnnotationSet::new();
        let mut other = AnnotationSet::new();
        other.deprecated = Some(vec![]);
        base.merge(other);
        assert_eq!(base.deprecated, Some(vec![]));
        assert!(!base.is_empty());
    }

    #[test]
    fn test_push_unknown_preserves_order() {
        let mut set = AnnotationSet::new();
        set.push_unknown("note", "first");
        set.push_unknown("note", "second");
        assert_eq!(set.unknown["note"], vec!["first", "second"]);
    }
}
