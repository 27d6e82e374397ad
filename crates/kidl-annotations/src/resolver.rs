//! Typedef alias resolution
//!
//! Follows `Typedef.alias` links until a structural type is reached.
//! Chains that revisit a node are reported instead of followed forever.

use std::collections::HashSet;

use kidl_ast::{TypeGraph, TypeId, TypeKind, TypeNode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Full chain, e.g. "A.x -> A.y -> A.x"
    #[error("typedef chain {chain} is cyclic")]
    CyclicTypedef { chain: String },

    #[error("type #{id} does not exist in the type graph")]
    DanglingType { id: u32 },
}

/// A base type reached from some starting type
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'g> {
    /// The non-typedef node at the end of the chain
    pub id: TypeId,
    pub node: &'g TypeNode,
    /// Number of aliasing hops taken; 0 if the start was not a typedef
    pub depth: usize,
}

impl<'g> Resolved<'g> {
    pub fn kind(&self) -> &'g TypeKind {
        &self.node.kind
    }
}

/// Resolve `id` to its base type
pub fn resolve(graph: &TypeGraph, id: TypeId) -> Result<Resolved<'_>, ResolveError> {
    let mut current = id;
    let mut depth = 0;
    let mut visited = HashSet::new();
    let mut chain: Vec<TypeId> = Vec::new();

    loop {
        let node = graph
            .get(current)
            .ok_or(ResolveError::DanglingType { id: current.0 })?;

        let TypeKind::Typedef { alias, .. } = &node.kind else {
            return Ok(Resolved {
                id: current,
                node,
                depth,
            });
        };

        if !visited.insert(current) {
            chain.push(current);
            let chain = describe_chain(graph, &chain);
            tracing::warn!(%chain, "cyclic typedef chain");
            return Err(ResolveError::CyclicTypedef { chain });
        }

        chain.push(current);
        current = *alias;
        depth += 1;
    }
}

fn describe_chain(graph: &TypeGraph, chain: &[TypeId]) -> String {
    chain
        .iter()
        .map(|id| match graph.get(*id).map(|n| &n.kind) {
            Some(TypeKind::Typedef { module, name, .. }) => format!("{}.{}", module, name),
            _ => format!("#{}", id.0),
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
