//! Selection trees for `@searchable` path expressions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Selector that steps into the elements of a list
pub const LIST_WILDCARD: &str = "[*]";

/// Selector that steps into the values of a mapping
pub const MAPPING_WILDCARD: &str = "*";

/// Recursive selector -> subtree mapping. An empty tree selects the node
/// it hangs off as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTree {
    children: BTreeMap<String, PathTree>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminal selection has no sub-selectors
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.children.contains_key(selector)
    }

    pub fn child(&self, selector: &str) -> Option<&PathTree> {
        self.children.get(selector)
    }

    /// Child for `selector`, created empty if absent
    pub fn child_mut(&mut self, selector: &str) -> &mut PathTree {
        self.children.entry(selector.to_string()).or_default()
    }

    /// Walk `path` from this node, creating every missing step
    pub fn descend_mut(&mut self, path: &[String]) -> &mut PathTree {
        path.iter()
            .fold(self, |node, selector| node.child_mut(selector))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(|k| k.as_str())
    }

    /// Union another tree into this one
    pub fn merge(&mut self, other: PathTree) {
        for (selector, subtree) in other.children {
            self.children.entry(selector).or_default().merge(subtree);
        }
    }

    /// Every root-to-leaf path, dot-joined
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(String::new(), &mut out);
        out
    }

    fn collect_paths(&self, prefix: String, out: &mut Vec<String>) {
        for (selector, subtree) in &self.children {
            let path = if prefix.is_empty() {
                selector.clone()
            } else {
                format!("{}.{}", prefix, selector)
            };
            if subtree.is_terminal() {
                out.push(path);
            } else {
                subtree.collect_paths(path, out);
            }
        }
    }
}
