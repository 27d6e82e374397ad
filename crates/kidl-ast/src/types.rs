//! Type graph representation
//!
//! Types are stored in an arena and referenced by `TypeId`. Named types
//! (typedefs) are additionally registered in the global type table under
//! their `(module, name)` pair.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AnnotationSet;

/// Handle to a node in a `TypeGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
        }
    }

    /// Whether `@range` may be applied to this scalar
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeId,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The structural shape of a type node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// `int`, `float`, `string`, `boolean`
    Scalar { scalar: ScalarKind },

    /// `structure { ... }`, fields in declaration order
    Struct { fields: Vec<FieldDef> },

    /// `list<T>`
    List { element: TypeId },

    /// `mapping<K, V>`
    Mapping { key: TypeId, value: TypeId },

    /// `tuple<A, B, ...>`
    Tuple { elements: Vec<TypeId> },

    /// `typedef <alias> Module.name;` - a single aliasing step
    Typedef {
        module: String,
        name: String,
        #[serde(default)]
        comment: String,
        alias: TypeId,
    },

    /// `UnspecifiedObject`
    UnspecifiedObject,
}

impl TypeKind {
    /// Short human-readable name of the variant, used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            TypeKind::Scalar { scalar } => scalar.to_string(),
            TypeKind::Struct { .. } => "structure".to_string(),
            TypeKind::List { .. } => "list".to_string(),
            TypeKind::Mapping { .. } => "mapping".to_string(),
            TypeKind::Tuple { .. } => "tuple".to_string(),
            TypeKind::Typedef { module, name, .. } => format!("typedef {}.{}", module, name),
            TypeKind::UnspecifiedObject => "UnspecifiedObject".to_string(),
        }
    }

    /// Look up a struct field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        match self {
            TypeKind::Struct { fields } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Type nodes directly referenced by this one
    pub fn children(&self) -> Vec<TypeId> {
        match self {
            TypeKind::Struct { fields } => fields.iter().map(|f| f.ty).collect(),
            TypeKind::List { element } => vec![*element],
            TypeKind::Mapping { key, value } => vec![*key, *value],
            TypeKind::Tuple { elements } => elements.clone(),
            TypeKind::Typedef { alias, .. } => vec![*alias],
            TypeKind::Scalar { .. } | TypeKind::UnspecifiedObject => vec![],
        }
    }
}

/// A node in the type graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotationSet>,
}

impl TypeNode {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            annotations: None,
        }
    }

    /// Raw comment attached to the node; only typedefs carry one
    pub fn comment(&self) -> &str {
        match &self.kind {
            TypeKind::Typedef { comment, .. } => comment,
            _ => "",
        }
    }
}

/// Arena of type nodes plus the global `(module, name)` type table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    /// All nodes indexed by `TypeId`
    nodes: Vec<TypeNode>,

    /// module -> type name -> node
    #[serde(default)]
    table: BTreeMap<String, BTreeMap<String, TypeId>>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anonymous node to the arena
    pub fn add(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(TypeNode::new(kind));
        id
    }

    pub fn scalar(&mut self, scalar: ScalarKind) -> TypeId {
        self.add(TypeKind::Scalar { scalar })
    }

    pub fn structure(&mut self, fields: Vec<FieldDef>) -> TypeId {
        self.add(TypeKind::Struct { fields })
    }

    pub fn list(&mut self, element: TypeId) -> TypeId {
        self.add(TypeKind::List { element })
    }

    pub fn mapping(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.add(TypeKind::Mapping { key, value })
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.add(TypeKind::Tuple { elements })
    }

    /// Add a typedef node and register it in the type table
    pub fn typedef(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        comment: impl Into<String>,
        alias: TypeId,
    ) -> TypeId {
        let module = module.into();
        let name = name.into();
        let id = self.add(TypeKind::Typedef {
            module: module.clone(),
            name: name.clone(),
            comment: comment.into(),
            alias,
        });
        self.register(module, name, id);
        id
    }

    /// Register an existing node under `(module, name)`
    pub fn register(&mut self, module: impl Into<String>, name: impl Into<String>, id: TypeId) {
        self.table
            .entry(module.into())
            .or_default()
            .insert(name.into(), id);
    }

    /// Get a node by ID
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Look up a named type in the table
    pub fn lookup(&self, module: &str, name: &str) -> Option<TypeId> {
        self.table.get(module)?.get(name).copied()
    }

    /// Iterate over the type table in `(module, name)` order
    pub fn named(&self) -> impl Iterator<Item = (&str, &str, TypeId)> {
        self.table.iter().flat_map(|(module, types)| {
            types
                .iter()
                .map(move |(name, id)| (module.as_str(), name.as_str(), *id))
        })
    }

    /// Iterate over all nodes in arena order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (TypeId(i as u32), node))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut TypeNode> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
