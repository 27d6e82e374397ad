use kidl_annotations::{AnnotationReport, DeclarationRef};
use kidl_ast::{AnnotationSet, Compilation};

/// Annotation set of a named type, which must exist and be initialized
pub fn type_annotations<'a>(compilation: &'a Compilation, module: &str, name: &str) -> &'a AnnotationSet {
    let id = compilation
        .types
        .lookup(module, name)
        .unwrap_or_else(|| panic!("Expected type {}.{}", module, name));
    compilation
        .types
        .get(id)
        .and_then(|node| node.annotations.as_ref())
        .unwrap_or_else(|| panic!("Expected annotations on {}.{}", module, name))
}

/// Flags of the warnings reported for one declaration, in order
pub fn warned_flags(report: &AnnotationReport, target: &DeclarationRef) -> Vec<String> {
    report
        .warnings_for(target)
        .map(|w| w.flag.clone())
        .collect()
}
