//! End-to-end tests for the annotation pass over JSON fixtures

mod common;

use common::assertions::{type_annotations, warned_flags};
use common::fixtures::load_compilation;

use kidl::annotations::{annotate, AnnotatorConfig, DeclarationRef, WarningKind, WARNING_PREFIX};
use kidl::ast::RangeAnnotation;

#[test]
fn e2e_genome_counts_and_warning_order() {
    let mut compilation = load_compilation("genome.json");
    let report = annotate(&mut compilation, &AnnotatorConfig::default());

    assert_eq!(report.modules, 1);
    assert_eq!(report.types, 5);
    assert_eq!(report.functions, 1);

    // modules first, then types in table order, then functions
    let flags: Vec<_> = report.warnings.iter().map(|w| w.flag.as_str()).collect();
    assert_eq!(
        flags,
        vec!["author", "optional", "searchable", "frobnicate", "range"]
    );
}

#[test]
fn e2e_genome_structure_annotations() {
    let mut compilation = load_compilation("genome.json");
    annotate(&mut compilation, &AnnotatorConfig::default());

    let genome = type_annotations(&compilation, "KB", "Genome");
    assert_eq!(genome.optional, vec!["source"]);
    assert_eq!(genome.deprecated, Some(vec!["KB.Genome2".to_string()]));
    assert_eq!(genome.metadata.ws["Num features"], "length(features)");
    assert_eq!(genome.unknown["frobnicate"], vec!["yes please"]);

    let searchable = genome.searchable_ws_subset.as_ref().unwrap();
    // the invalid path stays in the tree after its warning
    assert_eq!(
        searchable.fields.paths(),
        vec!["features.[*].id", "features.[*].tags", "features.x"]
    );
    assert_eq!(searchable.keys.paths(), vec!["aliases"]);

    let feature = type_annotations(&compilation, "KB", "Feature");
    assert_eq!(feature.optional, vec!["tags"]);
}

#[test]
fn e2e_genome_scalar_annotations() {
    let mut compilation = load_compilation("genome.json");
    let report = annotate(&mut compilation, &AnnotatorConfig::default());

    let ratio = type_annotations(&compilation, "KB", "Ratio");
    assert_eq!(
        ratio.range,
        Some(RangeAnnotation {
            minimum: Some("0".into()),
            exclusive_minimum: Some(false),
            maximum: Some("1".into()),
            exclusive_maximum: Some(false),
        })
    );

    let feature_id = type_annotations(&compilation, "KB", "feature_id");
    let id = feature_id.id.as_ref().unwrap();
    assert_eq!(id.id_type, "ws");
    assert_eq!(id.attributes, vec!["KB.Genome"]);

    let bad = DeclarationRef::typedef("KB", "bad_range");
    assert!(type_annotations(&compilation, "KB", "bad_range").range.is_none());
    let warning = report.warnings_for(&bad).next().unwrap();
    assert!(matches!(warning.kind, WarningKind::TypeMismatch { .. }));
}

#[test]
fn e2e_genome_module_and_function() {
    let mut compilation = load_compilation("genome.json");
    let report = annotate(&mut compilation, &AnnotatorConfig::default());

    let module = compilation.modules().next().unwrap();
    let module_set = module.annotations.as_ref().unwrap();
    assert_eq!(module_set.unknown["author"], vec!["someone"]);
    assert_eq!(
        warned_flags(&report, &DeclarationRef::module("KB")),
        vec!["author"]
    );

    // functions keep repeated replacements
    let function = &module.components[0];
    assert_eq!(
        function.annotations.as_ref().unwrap().deprecated,
        Some(vec![
            "KB.get_genome2".to_string(),
            "KB.get_genome2".to_string()
        ])
    );
    assert!(warned_flags(&report, &DeclarationRef::function("KB", "get_genome")).is_empty());
}

#[test]
fn e2e_genome_every_reachable_node_annotated() {
    let mut compilation = load_compilation("genome.json");
    annotate(&mut compilation, &AnnotatorConfig::default());

    for (id, node) in compilation.types.iter() {
        assert!(node.annotations.is_some(), "node {:?} has no annotations", id);
    }
}

#[test]
fn e2e_genome_rerun_is_stable() {
    let mut compilation = load_compilation("genome.json");
    let first = annotate(&mut compilation, &AnnotatorConfig::default());
    let once = serde_json::to_value(&compilation).unwrap();

    let second = annotate(&mut compilation, &AnnotatorConfig::default());
    assert_eq!(first, second);
    assert_eq!(once, serde_json::to_value(&compilation).unwrap());
}

#[test]
fn e2e_genome_warning_log() {
    let mut compilation = load_compilation("genome.json");
    let report = annotate(&mut compilation, &AnnotatorConfig::default());

    let log = report.render().unwrap();
    assert!(log.starts_with("total annotation warnings: 5\n"));
    assert_eq!(log.matches(WARNING_PREFIX).count(), 5);
    assert!(log.contains("    in typedef KB.Feature"));
    assert!(log.contains("    in module KB"));

    let quiet = annotate(
        &mut compilation,
        &AnnotatorConfig {
            ignore_warnings: true,
        },
    );
    assert_eq!(quiet.warning_count(), 5);
    assert!(quiet.render().is_none());
}
