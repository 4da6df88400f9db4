use tree_sitter::Node;

use crate::diagnostic::{Removal, RemovalKind, Slot};
use crate::edit::TextEditor;
use crate::parse::SyntaxKind;
use crate::walker::Ancestors;

const BOM: char = '\u{feff}';

/// Turns a decision to remove a node into a text edit that leaves the
/// program syntactically valid.
pub(crate) struct Eliminator<'s> {
    editor: TextEditor<'s>,
    path: String,
    removals: Vec<Removal>,
    /// Every byte of the original before this offset has been deleted.
    cleared_through: usize,
}

impl<'s> Eliminator<'s> {
    pub fn new(editor: TextEditor<'s>, path: &str) -> Self {
        // A byte order mark is kept but counts as nothing for trimming.
        let cleared_through = if editor.source().starts_with(BOM) {
            BOM.len_utf8()
        } else {
            0
        };
        Self {
            editor,
            path: path.to_string(),
            removals: Vec::new(),
            cleared_through,
        }
    }

    pub fn mark(&mut self, offset: usize) {
        self.editor.mark(offset);
    }

    pub fn is_edited(&self) -> bool {
        self.editor.is_edited()
    }

    pub fn finish(self) -> (TextEditor<'s>, Vec<Removal>) {
        (self.editor, self.removals)
    }

    /// Remove a matched call. As the whole of an expression statement it
    /// takes the statement with it; anywhere else the value is replaced.
    pub fn remove_call<'t>(
        &mut self,
        node: Node<'t>,
        ancestors: &Ancestors<'_, 't>,
        keypath: String,
    ) {
        let mut chain = ancestors.iter();
        let mut outer = node;
        let mut parent = chain.next();
        while let Some(p) = parent {
            if SyntaxKind::of(&p) != SyntaxKind::Parenthesized {
                break;
            }
            outer = p;
            parent = chain.next();
        }

        let kind = RemovalKind::Call { keypath };
        match parent {
            Some(statement) if SyntaxKind::of(&statement) == SyntaxKind::ExpressionStatement => {
                self.remove_statement(statement, chain.next(), kind);
            }
            _ => {
                let replacement = if needs_parens(outer, parent) {
                    "(void 0)"
                } else {
                    "void 0"
                };
                self.editor
                    .overwrite(outer.start_byte(), outer.end_byte(), replacement);
                self.record(node.start_byte(), kind, Slot::Expression);
            }
        }
    }

    /// Remove a statement. Inside a block it is deleted along with the
    /// whitespace before it; as the sole body of a construct it becomes an
    /// empty statement expression.
    pub fn remove_statement(
        &mut self,
        node: Node<'_>,
        parent: Option<Node<'_>>,
        kind: RemovalKind,
    ) {
        let in_block = parent.is_some_and(|p| SyntaxKind::of(&p).is_block());
        if !in_block {
            self.editor
                .overwrite(node.start_byte(), node.end_byte(), "void 0;");
            self.record(node.start_byte(), kind, Slot::StatementBody);
            return;
        }

        let text = self.editor.source();
        let mut start = text[..node.start_byte()]
            .trim_end()
            .len()
            .max(self.cleared_through.min(node.start_byte()));
        let mut end = node.end_byte();
        // When code follows on the same line, keep the line break before the
        // statement; it may be what ends a `//` comment.
        let rest_of_line = text[end..].split('\n').next().unwrap_or_default();
        if !rest_of_line.trim().is_empty() {
            if let Some(newline) = text[start..node.start_byte()].rfind('\n') {
                start += newline + 1;
            }
        }
        if start <= self.cleared_through {
            // Nothing survives before this statement, so the whitespace
            // after it would become leading whitespace of the output.
            end += text[end..].len() - text[end..].trim_start().len();
            self.cleared_through = end;
        }
        self.editor.remove(start, end);
        self.record(node.start_byte(), kind, Slot::BlockMember);
    }

    fn record(&mut self, offset: usize, kind: RemovalKind, slot: Slot) {
        log::trace!("{}: removing {kind} at byte {offset}", self.path);
        let location = self.editor.source_file().location(offset);
        self.removals.push(Removal {
            path: self.path.clone(),
            location,
            kind,
            slot,
        });
    }
}

/// `void 0` binds looser than member access, calls and the left side of
/// `**`, so in those positions it must be parenthesized. A decorator only
/// takes a member chain or a call unless its expression is parenthesized.
fn needs_parens(node: Node<'_>, parent: Option<Node<'_>>) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    let field = match parent.kind() {
        "member_expression" | "subscript_expression" => "object",
        "call_expression" => "function",
        "new_expression" => "constructor",
        // `@void 0` is not a decorator.
        "decorator" => return true,
        "binary_expression" => {
            let is_pow = parent
                .child_by_field_name("operator")
                .is_some_and(|op| op.kind() == "**");
            if !is_pow {
                return false;
            }
            "left"
        }
        _ => return false,
    };
    parent
        .child_by_field_name(field)
        .is_some_and(|child| child.id() == node.id())
}
