//! Path expression parser
//!
//! ```text
//! path    := segment ('.' segment)*
//! segment := name | '(' path (',' path)* ')'
//! ```
//!
//! `[*]` and `*` are ordinary names here; the validator gives them meaning.

use kidl_ast::PathTree;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathSyntaxError {
    #[error("illegal use of '.' at position {position}")]
    IllegalDot { position: usize },

    #[error("illegal use of '(' at position {position}")]
    IllegalOpen { position: usize },

    #[error("unbalanced parentheses, ')' at position {position} without matching '('")]
    UnmatchedClose { position: usize },

    #[error("unbalanced parentheses, '(' without matching ')'")]
    UnmatchedOpen,

    #[error("illegal field name path at position {position}")]
    IllegalName { position: usize },
}

/// Cursor state while scanning one expression. Pointers are paths from the
/// root of the tree being built.
struct PathParser {
    tree: PathTree,
    current: Vec<String>,
    stack: Vec<Vec<String>>,
    name: String,
    accepting_open: bool,
    accepting_name: bool,
}

impl PathParser {
    fn new() -> Self {
        Self {
            tree: PathTree::new(),
            current: Vec::new(),
            stack: Vec::new(),
            name: String::new(),
            accepting_open: true,
            accepting_name: true,
        }
    }

    /// Add the buffered name under the current pointer without descending
    fn materialize(&mut self) {
        if self.name.is_empty() {
            return;
        }
        let name = std::mem::take(&mut self.name);
        self.tree.descend_mut(&self.current).child_mut(&name);
    }

    fn step(&mut self, position: usize, c: char) -> Result<(), PathSyntaxError> {
        match c {
            '.' => {
                if self.name.is_empty() {
                    return Err(PathSyntaxError::IllegalDot { position });
                }
                self.current.push(std::mem::take(&mut self.name));
                self.tree.descend_mut(&self.current);
                self.accepting_open = true;
                self.accepting_name = true;
            }
            '(' => {
                if !self.accepting_open {
                    return Err(PathSyntaxError::IllegalOpen { position });
                }
                self.stack.push(self.current.clone());
            }
            ')' => {
                let Some(saved) = self.stack.pop() else {
                    return Err(PathSyntaxError::UnmatchedClose { position });
                };
                self.materialize();
                self.current = saved;
                self.accepting_open = false;
                self.accepting_name = false;
            }
            ',' => {
                self.materialize();
                self.current = self.stack.last().cloned().unwrap_or_default();
                self.accepting_open = true;
                self.accepting_name = true;
            }
            _ => {
                if !self.accepting_name {
                    return Err(PathSyntaxError::IllegalName { position });
                }
                self.name.push(c);
                self.accepting_open = false;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<PathTree, PathSyntaxError> {
        self.materialize();
        if !self.stack.is_empty() {
            return Err(PathSyntaxError::UnmatchedOpen);
        }
        Ok(self.tree)
    }
}

/// Parse one path expression into a fresh tree. On error nothing is
/// returned, so callers never see a partially built selection.
pub fn parse_path(expr: &str) -> Result<PathTree, PathSyntaxError> {
    let mut parser = PathParser::new();
    for (position, c) in expr.chars().enumerate() {
        parser.step(position, c)?;
    }
    parser.finish()
}

/// Split a `keys_of(...)` wrapper off a path parameter
pub fn strip_keys_of(param: &str) -> (&str, bool) {
    match param
        .strip_prefix("keys_of(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (param, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(expr: &str) -> Vec<String> {
        parse_path(expr).unwrap().paths()
    }

    #[test]
    fn test_single_name() {
        assert_eq!(paths("id"), vec!["id"]);
    }

    #[test]
    fn test_dotted_path() {
        let tree = parse_path("a.b").unwrap();
        let a = tree.child("a").unwrap();
        assert!(a.child("b").unwrap().is_terminal());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_wildcards_are_names() {
        assert_eq!(paths("list.[*].x"), vec!["list.[*].x"]);
        assert_eq!(paths("m.*.y"), vec!["m.*.y"]);
    }

    #[test]
    fn test_group_after_dot() {
        assert_eq!(paths("a.(b,c)"), vec!["a.b", "a.c"]);
    }

    #[test]
    fn test_group_with_nested_paths() {
        assert_eq!(paths("a.(b.x,c)"), vec!["a.b.x", "a.c"]);
    }

    #[test]
    fn test_group_at_start() {
        assert_eq!(paths("(a,b)"), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(paths("a.(b.(x,y),c)"), vec!["a.b.x", "a.b.y", "a.c"]);
    }

    #[test]
    fn test_top_level_comma_returns_to_root() {
        assert_eq!(paths("a.b,c"), vec!["a.b", "c"]);
    }

    #[test]
    fn test_comma_after_group() {
        assert_eq!(paths("a.(b,c),d"), vec!["a.b", "a.c", "d"]);
    }

    #[test]
    fn test_trailing_dot_selects_parent() {
        let tree = parse_path("a.").unwrap();
        assert!(tree.child("a").unwrap().is_terminal());
    }

    #[test]
    fn test_empty_expression() {
        assert!(parse_path("").unwrap().is_terminal());
    }

    #[test]
    fn test_leading_dot_is_illegal() {
        assert_eq!(
            parse_path(".a").unwrap_err(),
            PathSyntaxError::IllegalDot { position: 0 }
        );
    }

    #[test]
    fn test_double_dot_is_illegal() {
        assert_eq!(
            parse_path("a..b").unwrap_err(),
            PathSyntaxError::IllegalDot { position: 2 }
        );
    }

    #[test]
    fn test_open_after_name_is_illegal() {
        assert_eq!(
            parse_path("a(b)").unwrap_err(),
            PathSyntaxError::IllegalOpen { position: 1 }
        );
    }

    #[test]
    fn test_name_after_close_is_illegal() {
        assert_eq!(
            parse_path("a.(b)c").unwrap_err(),
            PathSyntaxError::IllegalName { position: 5 }
        );
    }

    #[test]
    fn test_dot_after_close_is_illegal() {
        assert_eq!(
            parse_path("a.(b).c").unwrap_err(),
            PathSyntaxError::IllegalDot { position: 5 }
        );
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(
            parse_path("a)").unwrap_err(),
            PathSyntaxError::UnmatchedClose { position: 1 }
        );
    }

    #[test]
    fn test_unmatched_open() {
        assert_eq!(
            parse_path("a.(b,c").unwrap_err(),
            PathSyntaxError::UnmatchedOpen
        );
    }

    #[test]
    fn test_strip_keys_of() {
        assert_eq!(strip_keys_of("keys_of(a.b)"), ("a.b", true));
        assert_eq!(strip_keys_of("a.b"), ("a.b", false));
        assert_eq!(strip_keys_of("keys_of(a"), ("keys_of(a", false));
    }
}
