//! Annotation assembler
//!
//! Runs the scanner and validators over every declaration of a compilation
//! in three phases (modules, types, functions) and collects the warnings in
//! that order. Every run starts from cleared annotation sets, so running it
//! twice over the same input gives the same result.

use std::collections::HashSet;

use kidl_ast::{AnnotationSet, Compilation, TypeGraph, TypeId, TypeKind};

use crate::validators::{
    function_validators, module_validators, typedef_validators, DirectiveValidator,
    FunctionContext, ModuleContext, TypedefContext,
};
use crate::{scan, AnnotationReport, AnnotationWarning, AnnotatorConfig, DeclarationRef, WarningKind};

/// Drives the annotation pass
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    config: AnnotatorConfig,
}

impl Annotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self { config }
    }

    /// Annotate every module, type and function in `compilation`
    pub fn run(&self, compilation: &mut Compilation) -> AnnotationReport {
        let Compilation { types, services } = compilation;

        clear_annotations(types);
        for compiled in services.values_mut().flatten() {
            compiled.module.annotations = None;
            for function in &mut compiled.module.components {
                function.annotations = None;
            }
        }

        let mut report = AnnotationReport {
            suppressed: self.config.ignore_warnings,
            ..Default::default()
        };

        // Phase 1: modules
        for compiled in services.values_mut().flatten() {
            let module = &mut compiled.module;
            let target = DeclarationRef::module(&module.name);
            let (set, warnings) = {
                let validators = module_validators();
                let ctx = ModuleContext { name: &module.name };
                apply_directives(&module.comment, &validators, &ctx, &target)
            };
            module.annotations = Some(set);
            report.warnings.extend(warnings);
            report.modules += 1;
        }

        // Phase 2: every type in the table, including included modules
        let (count, warnings) = annotate_types(types);
        report.types = count;
        report.warnings.extend(warnings);

        // Phase 3: functions
        for compiled in services.values_mut().flatten() {
            for function in &mut compiled.module.components {
                let signature: Vec<TypeId> = function
                    .parameters
                    .iter()
                    .chain(&function.returns)
                    .map(|field| field.ty)
                    .collect();
                init_annotations(types, &signature);

                let target = DeclarationRef::function(&function.module, &function.name);
                let (set, warnings) = {
                    let validators = function_validators();
                    let ctx = FunctionContext {
                        module: &function.module,
                        name: &function.name,
                    };
                    apply_directives(&function.comment, &validators, &ctx, &target)
                };
                function.annotations = Some(set);
                report.warnings.extend(warnings);
                report.functions += 1;
            }
        }

        tracing::info!(
            modules = report.modules,
            types = report.types,
            functions = report.functions,
            warnings = report.warning_count(),
            "annotation pass finished"
        );
        report
    }
}

fn annotate_types(graph: &mut TypeGraph) -> (usize, Vec<AnnotationWarning>) {
    let named: Vec<(String, String, TypeId)> = graph
        .named()
        .map(|(module, name, id)| (module.to_string(), name.to_string(), id))
        .collect();

    let roots: Vec<TypeId> = named.iter().map(|(_, _, id)| *id).collect();
    init_annotations(graph, &roots);

    let mut count = 0;
    let mut all_warnings = Vec::new();

    for (module, name, id) in &named {
        let Some(node) = graph.get(*id) else {
            continue;
        };
        if matches!(
            node.kind,
            TypeKind::Scalar { .. } | TypeKind::UnspecifiedObject
        ) {
            continue;
        }

        let target = DeclarationRef::typedef(module, name);
        let (set, warnings) = {
            let validators = typedef_validators();
            let ctx = TypedefContext::new(graph, *id, module, name);
            apply_directives(node.comment(), &validators, &ctx, &target)
        };

        if let Some(node) = graph.get_mut(*id) {
            node.annotations.get_or_insert_with(AnnotationSet::new).merge(set);
        }
        all_warnings.extend(warnings);
        count += 1;
    }

    (count, all_warnings)
}

/// Scan `comment` and dispatch each directive to the validator for its flag
fn apply_directives<C>(
    comment: &str,
    validators: &[Box<dyn DirectiveValidator<C>>],
    ctx: &C,
    target: &DeclarationRef,
) -> (AnnotationSet, Vec<AnnotationWarning>) {
    let directives = scan(comment);
    tracing::debug!(%target, directives = directives.len(), "annotating declaration");

    let mut set = AnnotationSet::new();
    let mut warnings = Vec::new();

    for directive in &directives {
        let Some(validator) = validators.iter().find(|v| v.flag() == directive.flag) else {
            tracing::debug!(%target, flag = %directive.flag, "unrecognized directive");
            set.push_unknown(&directive.flag, &directive.body);
            warnings.push(AnnotationWarning::new(
                &directive.flag,
                target.clone(),
                WarningKind::Unrecognized,
            ));
            continue;
        };

        let rejected = validator.validate(directive, ctx, &mut set);
        tracing::debug!(%target, flag = %directive.flag, rejected = rejected.len(), "applied directive");
        warnings.extend(
            rejected
                .into_iter()
                .map(|kind| AnnotationWarning::new(&directive.flag, target.clone(), kind)),
        );
    }

    (set, warnings)
}

fn clear_annotations(graph: &mut TypeGraph) {
    for node in graph.nodes_mut() {
        node.annotations = None;
    }
}

/// Give every node reachable from `roots` an annotation set, keeping any
/// set that is already there
fn init_annotations(graph: &mut TypeGraph, roots: &[TypeId]) {
    let mut visited = HashSet::new();
    let mut pending: Vec<TypeId> = roots.to_vec();

    while let Some(id) = pending.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = graph.get_mut(id) else {
            continue;
        };
        node.annotations.get_or_insert_with(AnnotationSet::new);
        pending.extend(node.kind.children());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kidl_ast::{FieldDef, FunctionDef, ModuleDef, ScalarKind};

    fn compilation() -> Compilation {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(ScalarKind::String);
        let int = graph.scalar(ScalarKind::Int);
        let s = graph.structure(vec![FieldDef::new("a", string), FieldDef::new("b", int)]);
        let thing = graph.typedef("M", "Thing", "@optional a\n@frobnicate x y", s);
        let list = graph.list(thing);
        graph.typedef("M", "Things", "", list);
        // registered scalar without a typedef wrapper
        graph.register("M", "raw", int);

        let mut compilation = Compilation::new(graph);
        let function = FunctionDef::new("M", "get")
            .with_comment("@deprecated M.get2")
            .with_parameter(FieldDef::new("id", string))
            .with_return(FieldDef::new("thing", thing));
        compilation.add_module(
            "svc",
            ModuleDef::new("M")
                .with_comment("@author someone")
                .with_function(function),
        );
        compilation
    }

    #[test]
    fn test_phases_and_counts() {
        let mut c = compilation();
        let report = Annotator::default().run(&mut c);

        assert_eq!(report.modules, 1);
        // Thing and Things; the raw scalar entry is skipped
        assert_eq!(report.types, 2);
        assert_eq!(report.functions, 1);

        let flags: Vec<_> = report.warnings.iter().map(|w| w.flag.as_str()).collect();
        assert_eq!(flags, vec!["author", "frobnicate"]);
    }

    #[test]
    fn test_annotations_attached() {
        let mut c = compilation();
        Annotator::default().run(&mut c);

        let thing = c.types.lookup("M", "Thing").unwrap();
        let set = c.types.get(thing).unwrap().annotations.as_ref().unwrap();
        assert_eq!(set.optional, vec!["a"]);
        assert_eq!(set.unknown["frobnicate"], vec!["x y"]);

        let module = c.modules().next().unwrap();
        assert_eq!(
            module.annotations.as_ref().unwrap().unknown["author"],
            vec!["someone"]
        );
        let function = &module.components[0];
        assert_eq!(
            function.annotations.as_ref().unwrap().deprecated,
            Some(vec!["M.get2".to_string()])
        );
    }

    #[test]
    fn test_every_reachable_node_initialized() {
        let mut graph = TypeGraph::new();
        let int = graph.scalar(ScalarKind::Int);
        let unreachable = graph.scalar(ScalarKind::Float);
        let list = graph.list(int);
        graph.typedef("M", "Ints", "", list);
        let mut c = Compilation::new(graph);

        Annotator::default().run(&mut c);

        for (id, node) in c.types.iter() {
            if id == unreachable {
                assert!(node.annotations.is_none());
            } else {
                assert!(node.annotations.is_some(), "node {:?} not initialized", id);
            }
        }
    }

    #[test]
    fn test_function_signature_types_initialized() {
        let mut graph = TypeGraph::new();
        let int = graph.scalar(ScalarKind::Int);
        let tuple = graph.tuple(vec![int]);
        let mut c = Compilation::new(graph);
        c.add_module(
            "svc",
            ModuleDef::new("M")
                .with_function(FunctionDef::new("M", "f").with_return(FieldDef::new("t", tuple))),
        );

        Annotator::default().run(&mut c);
        assert!(c.types.get(tuple).unwrap().annotations.is_some());
        assert!(c.types.get(int).unwrap().annotations.is_some());
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let mut c = compilation();
        let first = Annotator::default().run(&mut c);
        let once = c.clone();
        let second = Annotator::default().run(&mut c);

        assert_eq!(first, second);
        assert_eq!(once, c);
    }

    #[test]
    fn test_cyclic_typedef_terminates_with_warning() {
        let mut graph = TypeGraph::new();
        // the first node aliases itself
        graph.typedef("M", "a", "@optional x", TypeId(0));
        let mut c = Compilation::new(graph);

        let report = Annotator::default().run(&mut c);
        assert_eq!(report.warning_count(), 1);
        assert!(matches!(report.warnings[0].kind, WarningKind::Resolve(_)));
    }

    #[test]
    fn test_ignore_warnings_suppresses_render() {
        let mut c = compilation();
        let report = Annotator::new(AnnotatorConfig {
            ignore_warnings: true,
        })
        .run(&mut c);
        assert!(report.has_warnings());
        assert!(report.render().is_none());
    }
}
