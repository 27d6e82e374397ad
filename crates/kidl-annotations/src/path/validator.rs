//! Path tree validation against the type graph
//!
//! Walks a `PathTree` and the type graph in lockstep. Structures are
//! entered by field name, lists only through `[*]`, mappings only through
//! `*`. Stops at the first problem.

use kidl_ast::{PathTree, TypeGraph, TypeId, TypeKind, LIST_WILDCARD, MAPPING_WILDCARD};
use thiserror::Error;

use crate::{resolve, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error(
        "keys_of(..) can only be applied to fields that resolve to a mapping, \
         but '{path}' resolves to {found}"
    )]
    KeysOfNonMapping { path: String, found: String },

    #[error("field '{field}' does not exist in structure {structure}")]
    UnknownField { field: String, structure: String },

    #[error(
        "'{path}' is a list; must use '[*]' to select subfields of objects \
         stored in a list, found '{selector}'"
    )]
    ListSelector { path: String, selector: String },

    #[error(
        "'{path}' is a mapping; must use '*' to select subfields of objects \
         stored in a mapping, found '{selector}'"
    )]
    MappingSelector { path: String, selector: String },

    #[error("cannot select sub-fields [{selectors}] of '{path}', which resolves to unsupported type {found}")]
    Unsupported {
        path: String,
        selectors: String,
        found: String,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Check that every selector in `tree` is legal starting from `base`.
/// In `keys_of` mode every terminal selection must resolve to a mapping.
pub fn validate_path(
    graph: &TypeGraph,
    tree: &PathTree,
    base: TypeId,
    keys_of: bool,
) -> Result<(), PathError> {
    walk(graph, tree, base, keys_of, "")
}

fn walk(
    graph: &TypeGraph,
    tree: &PathTree,
    ty: TypeId,
    keys_of: bool,
    path: &str,
) -> Result<(), PathError> {
    let resolved = resolve(graph, ty)?;

    if tree.is_terminal() {
        if keys_of && !matches!(resolved.kind(), TypeKind::Mapping { .. }) {
            return Err(PathError::KeysOfNonMapping {
                path: display_path(path),
                found: resolved.kind().describe(),
            });
        }
        return Ok(());
    }

    match resolved.kind() {
        TypeKind::Struct { fields } => {
            for (selector, subtree) in tree.iter() {
                let Some(field) = fields.iter().find(|f| f.name == selector) else {
                    return Err(PathError::UnknownField {
                        field: selector.to_string(),
                        structure: describe_structure(graph, ty, path),
                    });
                };
                walk(graph, subtree, field.ty, keys_of, &join(path, selector))?;
            }
            Ok(())
        }
        TypeKind::List { element } => {
            for (selector, subtree) in tree.iter() {
                if selector != LIST_WILDCARD {
                    return Err(PathError::ListSelector {
                        path: display_path(path),
                        selector: selector.to_string(),
                    });
                }
                walk(graph, subtree, *element, keys_of, &join(path, selector))?;
            }
            Ok(())
        }
        TypeKind::Mapping { value, .. } => {
            for (selector, subtree) in tree.iter() {
                if selector != MAPPING_WILDCARD {
                    return Err(PathError::MappingSelector {
                        path: display_path(path),
                        selector: selector.to_string(),
                    });
                }
                walk(graph, subtree, *value, keys_of, &join(path, selector))?;
            }
            Ok(())
        }
        TypeKind::Scalar { .. } | TypeKind::Tuple { .. } | TypeKind::UnspecifiedObject => {
            Err(PathError::Unsupported {
                path: display_path(path),
                selectors: tree.selectors().collect::<Vec<_>>().join(", "),
                found: resolved.kind().describe(),
            })
        }
        // resolve() never stops on a typedef
        TypeKind::Typedef { .. } => unreachable!("resolved type is a typedef"),
    }
}

fn join(path: &str, selector: &str) -> String {
    if path.is_empty() {
        selector.to_string()
    } else {
        format!("{}.{}", path, selector)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Typedef name when the structure is reached through one, else its path
fn describe_structure(graph: &TypeGraph, ty: TypeId, path: &str) -> String {
    match graph.get(ty).map(|n| &n.kind) {
        Some(TypeKind::Typedef { module, name, .. }) => format!("{}.{}", module, name),
        _ => format!("'{}'", display_path(path)),
    }
}
