//! Declarations produced by the front-end (modules and functions)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnnotationSet, FieldDef, TypeGraph};

/// A `funcdef` inside a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub parameters: Vec<FieldDef>,
    #[serde(default)]
    pub returns: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotationSet>,
}

impl FunctionDef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            comment: String::new(),
            parameters: Vec::new(),
            returns: Vec::new(),
            annotations: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_parameter(mut self, field: FieldDef) -> Self {
        self.parameters.push(field);
        self
    }

    pub fn with_return(mut self, field: FieldDef) -> Self {
        self.returns.push(field);
        self
    }
}

/// A `module Name { ... }` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub components: Vec<FunctionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotationSet>,
}

impl ModuleDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            components: Vec::new(),
            annotations: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.components.push(function);
        self
    }
}

/// A module as compiled by the front-end, with per-compilation data the
/// annotation pass does not look at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledModule {
    pub module: ModuleDef,
    /// Modules pulled in with `#include`
    #[serde(default)]
    pub includes: Vec<String>,
    /// Path of the source file the module came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl From<ModuleDef> for CompiledModule {
    fn from(module: ModuleDef) -> Self {
        Self {
            module,
            includes: Vec::new(),
            source: None,
        }
    }
}

/// Everything the front-end hands to the annotation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    /// All types available to the compilation, including included modules
    pub types: TypeGraph,
    /// Service (compilation unit) name -> modules it compiles
    #[serde(default)]
    pub services: BTreeMap<String, Vec<CompiledModule>>,
}

impl Compilation {
    pub fn new(types: TypeGraph) -> Self {
        Self {
            types,
            services: BTreeMap::new(),
        }
    }

    pub fn add_module(&mut self, service: impl Into<String>, module: impl Into<CompiledModule>) {
        self.services
            .entry(service.into())
            .or_default()
            .push(module.into());
    }

    /// All compiled modules in service order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDef> {
        self.services.values().flatten().map(|c| &c.module)
    }
}
