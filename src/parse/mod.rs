pub mod source;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser, Tree};

use crate::error::ParseError;

/// Grammar used to parse an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Pick by file extension.
    #[default]
    Auto,
    /// JavaScript, including JSX.
    Javascript,
    Typescript,
    Tsx,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Dialect::Auto),
            "javascript" | "js" | "jsx" => Ok(Dialect::Javascript),
            "typescript" | "ts" => Ok(Dialect::Typescript),
            "tsx" => Ok(Dialect::Tsx),
            _ => Err(format!("unknown dialect `{s}`")),
        }
    }
}

impl Dialect {
    /// Resolve `Auto` against an input identifier. Unknown extensions parse
    /// as JavaScript.
    pub fn resolve(self, id: &str) -> Dialect {
        if self != Dialect::Auto {
            return self;
        }
        match Path::new(id).extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Dialect::Typescript,
            Some("tsx") => Dialect::Tsx,
            _ => Dialect::Javascript,
        }
    }

    fn language(self) -> tree_sitter::Language {
        match self {
            Dialect::Auto | Dialect::Javascript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parser options forwarded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    pub dialect: Dialect,
}

/// Parse source text. Tree-sitter recovers from syntax errors, but a tree
/// with recovery nodes is not a program we may rewrite, so the first error
/// is reported instead.
///
/// `Parser` is `!Sync`; each call builds its own so workers never share one.
pub fn parse_source(source: &str, dialect: Dialect) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseError::at_start(format!("failed to load grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::at_start("parser produced no tree"))?;

    if tree.root_node().has_error() {
        if let Some(err) = first_error(tree.root_node(), source) {
            return Err(err);
        }
    }
    Ok(tree)
}

fn first_error(root: Node<'_>, source: &str) -> Option<ParseError> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let text = &source[node.start_byte()..node.end_byte()];
                let first_line = text.trim_start().lines().next().unwrap_or("");
                let snippet: String = first_line.chars().take(20).collect();
                if snippet.trim().is_empty() {
                    "unexpected token".to_string()
                } else {
                    format!("unexpected `{}`", snippet.trim())
                }
            };
            let pos = node.start_position();
            let line_start = node.start_byte() - pos.column;
            let column = source[line_start..node.start_byte()].chars().count();
            return Some(ParseError {
                message,
                offset: node.start_byte(),
                line: pos.row + 1,
                column,
            });
        }
        if !node.has_error() {
            continue;
        }
        // Reverse so the leftmost child is visited first.
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// The node kinds the stripper treats specially. Everything else is
/// traversed but never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Program,
    Block,
    ExpressionStatement,
    DebuggerStatement,
    CallExpression,
    MemberExpression,
    Identifier,
    This,
    Super,
    Parenthesized,
    Other(&'static str),
}

impl SyntaxKind {
    pub fn of(node: &Node<'_>) -> SyntaxKind {
        match node.kind() {
            "program" => SyntaxKind::Program,
            "statement_block" => SyntaxKind::Block,
            "expression_statement" => SyntaxKind::ExpressionStatement,
            "debugger_statement" => SyntaxKind::DebuggerStatement,
            "call_expression" => SyntaxKind::CallExpression,
            "member_expression" => SyntaxKind::MemberExpression,
            "identifier" => SyntaxKind::Identifier,
            "this" => SyntaxKind::This,
            "super" => SyntaxKind::Super,
            "parenthesized_expression" => SyntaxKind::Parenthesized,
            other => SyntaxKind::Other(other),
        }
    }

    /// Ordered, unbounded statement sequences where any member may be deleted.
    pub fn is_block(self) -> bool {
        matches!(self, SyntaxKind::Program | SyntaxKind::Block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_js(source: &str) -> Result<Tree, ParseError> {
        parse_source(source, Dialect::Javascript)
    }

    #[test]
    fn parse_valid_javascript() {
        let tree = parse_js("console.log('hello');").unwrap();
        assert_eq!(SyntaxKind::of(&tree.root_node()), SyntaxKind::Program);
    }

    #[test]
    fn parse_empty_source() {
        assert!(parse_js("").is_ok());
    }

    #[test]
    fn parse_syntax_error_reports_position() {
        let err = parse_js("let x = 1;\nfoo(;").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.offset >= 11, "offset {} should be on line 2", err.offset);
    }

    #[test]
    fn typescript_needs_typescript_dialect() {
        let source = "const x: number = 1;";
        assert!(parse_source(source, Dialect::Typescript).is_ok());
        assert!(parse_js(source).is_err());
    }

    #[test]
    fn jsx_parses_as_javascript() {
        assert!(parse_js("const el = <div>{x}</div>;").is_ok());
    }

    #[test]
    fn dialect_resolves_by_extension() {
        assert_eq!(Dialect::Auto.resolve("a/b.ts"), Dialect::Typescript);
        assert_eq!(Dialect::Auto.resolve("a/b.tsx"), Dialect::Tsx);
        assert_eq!(Dialect::Auto.resolve("a/b.mjs"), Dialect::Javascript);
        assert_eq!(Dialect::Auto.resolve("stdin"), Dialect::Javascript);
        assert_eq!(Dialect::Tsx.resolve("a/b.js"), Dialect::Tsx);
    }

    #[test]
    fn dialect_from_str() {
        assert_eq!("TypeScript".parse::<Dialect>(), Ok(Dialect::Typescript));
        assert_eq!("jsx".parse::<Dialect>(), Ok(Dialect::Javascript));
        let err = "coffee".parse::<Dialect>().unwrap_err();
        assert!(err.contains("coffee"), "{err}");
    }

    #[test]
    fn classifies_relevant_kinds() {
        let source = "if (a) { this.x(); debugger; }";
        let tree = parse_js(source).unwrap();
        let mut kinds = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            kinds.push(SyntaxKind::of(&node));
            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }
        for expected in [
            SyntaxKind::Program,
            SyntaxKind::Block,
            SyntaxKind::ExpressionStatement,
            SyntaxKind::DebuggerStatement,
            SyntaxKind::CallExpression,
            SyntaxKind::MemberExpression,
            SyntaxKind::This,
            SyntaxKind::Parenthesized,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
        assert!(kinds.contains(&SyntaxKind::Other("if_statement")));
    }
}
