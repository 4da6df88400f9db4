use tree_sitter::Node;

use crate::diagnostic::RemovalKind;
use crate::keypath::{Matcher, flatten};
use crate::parse::SyntaxKind;
use crate::strip::eliminator::Eliminator;
use crate::walker::{Ancestors, Visitor, Walk};

/// Decides, node by node, what to remove. Removed subtrees are not entered,
/// so nested matches inside a removed call produce no second edit.
pub(crate) struct RemovalPlanner<'a, 's> {
    matcher: &'a Matcher,
    remove_debugger: bool,
    track_positions: bool,
    source: &'s str,
    eliminator: Eliminator<'s>,
}

impl<'a, 's> RemovalPlanner<'a, 's> {
    pub fn new(
        matcher: &'a Matcher,
        remove_debugger: bool,
        track_positions: bool,
        source: &'s str,
        eliminator: Eliminator<'s>,
    ) -> Self {
        Self {
            matcher,
            remove_debugger,
            track_positions,
            source,
            eliminator,
        }
    }

    pub fn into_eliminator(self) -> Eliminator<'s> {
        self.eliminator
    }
}

impl<'t> Visitor<'t> for RemovalPlanner<'_, '_> {
    fn enter(&mut self, node: Node<'t>, ancestors: &Ancestors<'_, 't>) -> Walk {
        if self.track_positions {
            self.eliminator.mark(node.start_byte());
            self.eliminator.mark(node.end_byte());
        }

        match SyntaxKind::of(&node) {
            SyntaxKind::DebuggerStatement if self.remove_debugger => {
                self.eliminator
                    .remove_statement(node, ancestors.parent(), RemovalKind::Debugger);
                Walk::SkipChildren
            }
            SyntaxKind::CallExpression => {
                let keypath = node
                    .child_by_field_name("function")
                    .and_then(|callee| flatten(callee, self.source));
                match keypath {
                    Some(keypath) if self.matcher.is_match(&keypath) => {
                        self.eliminator.remove_call(node, ancestors, keypath);
                        Walk::SkipChildren
                    }
                    _ => Walk::Continue,
                }
            }
            _ => Walk::Continue,
        }
    }
}
