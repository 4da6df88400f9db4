use tree_sitter::{Node, Tree};

/// What the walker does after a node's `enter` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
}

/// The chain of nodes from the root down to (excluding) the node being
/// visited. Only valid for the duration of one `enter` call.
pub struct Ancestors<'a, 't> {
    stack: &'a [Node<'t>],
}

impl<'t> Ancestors<'_, 't> {
    pub fn parent(&self) -> Option<Node<'t>> {
        self.stack.last().copied()
    }

    /// Ancestors nearest first.
    pub fn iter(&self) -> impl Iterator<Item = Node<'t>> + '_ {
        self.stack.iter().rev().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

pub trait Visitor<'t> {
    /// Called for every named node in pre-order.
    fn enter(&mut self, node: Node<'t>, ancestors: &Ancestors<'_, 't>) -> Walk;
}

/// Pre-order traversal of every named node. The ancestor stack is pushed
/// before children are entered and popped when the cursor climbs back out,
/// so parent links never outlive the walk.
pub fn walk<'t, V: Visitor<'t>>(tree: &'t Tree, visitor: &mut V) {
    let mut cursor = tree.walk();
    let mut stack: Vec<Node<'t>> = Vec::new();

    loop {
        let node = cursor.node();
        let action = if node.is_named() {
            visitor.enter(node, &Ancestors { stack: &stack })
        } else {
            Walk::Continue
        };

        if action == Walk::Continue && cursor.goto_first_child() {
            stack.push(node);
            continue;
        }

        // No children to enter: move to the next sibling, climbing as needed.
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Dialect, parse_source};

    struct Recorder {
        entered: Vec<(String, Option<String>, usize)>,
        skip: &'static str,
    }

    impl<'t> Visitor<'t> for Recorder {
        fn enter(&mut self, node: Node<'t>, ancestors: &Ancestors<'_, 't>) -> Walk {
            self.entered.push((
                node.kind().to_string(),
                ancestors.parent().map(|p| p.kind().to_string()),
                ancestors.depth(),
            ));
            if node.kind() == self.skip {
                Walk::SkipChildren
            } else {
                Walk::Continue
            }
        }
    }

    fn record(source: &str, skip: &'static str) -> Vec<(String, Option<String>, usize)> {
        let tree = parse_source(source, Dialect::Javascript).unwrap();
        let mut recorder = Recorder {
            entered: Vec::new(),
            skip,
        };
        walk(&tree, &mut recorder);
        recorder.entered
    }

    #[test]
    fn visits_in_pre_order_with_parents() {
        let entered = record("f(a);", "");
        let kinds: Vec<_> = entered.iter().map(|(k, _, _)| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "program",
                "expression_statement",
                "call_expression",
                "identifier",
                "arguments",
                "identifier",
            ]
        );
        assert_eq!(entered[0].1, None);
        assert_eq!(entered[2].1.as_deref(), Some("expression_statement"));
        assert_eq!(entered[5].1.as_deref(), Some("arguments"));
        assert_eq!(entered[5].2, 4);
    }

    #[test]
    fn skip_children_prunes_subtree_only() {
        let entered = record("f(a); g(b);", "call_expression");
        let kinds: Vec<_> = entered.iter().map(|(k, _, _)| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "program",
                "expression_statement",
                "call_expression",
                "expression_statement",
                "call_expression",
            ]
        );
    }

    #[test]
    fn anonymous_tokens_are_not_entered() {
        let entered = record("x;", "");
        assert!(entered.iter().all(|(k, _, _)| k != ";"));
    }

    #[test]
    fn ancestors_iterate_nearest_first() {
        struct Chain(Vec<Vec<String>>);
        impl<'t> Visitor<'t> for Chain {
            fn enter(&mut self, node: Node<'t>, ancestors: &Ancestors<'_, 't>) -> Walk {
                if node.kind() == "number" {
                    self.0
                        .push(ancestors.iter().map(|n| n.kind().to_string()).collect());
                }
                Walk::Continue
            }
        }
        let tree = parse_source("{ 1; }", Dialect::Javascript).unwrap();
        let mut chain = Chain(Vec::new());
        walk(&tree, &mut chain);
        assert_eq!(
            chain.0,
            vec![vec!["expression_statement", "statement_block", "program"]]
        );
    }
}
