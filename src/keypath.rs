//! Keypath patterns such as `console.*` and the flattening of member chains
//! they are matched against.

use regex::Regex;
use tree_sitter::Node;

use crate::error::{Result, StripError};
use crate::parse::SyntaxKind;

/// What a `*` segment becomes: one or more ASCII word characters. It cannot
/// span a `.` or match an empty segment.
const WILDCARD: &str = "[A-Za-z0-9_]+";

const NOT_IDENT: &str = "[^A-Za-z0-9_$]";

/// Whitespace, parentheses and comments, any of which may sit between the
/// links of a member chain.
const LINK_FILLER: &str = r"(?:\s|[()]|/\*(?s:.*?)\*/|//[^\n]*\n)*";

/// Default patterns, covering the common diagnostic call families.
pub const DEFAULT_FUNCTIONS: &[&str] = &["console.*", "assert.*"];

/// Compiled keypath patterns. Built once per configuration and shared
/// read-only by every transform.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Anchored alternation of every pattern. `None` when no patterns are
    /// configured, in which case no call ever matches.
    pattern: Option<Regex>,
    /// Unanchored existence check over raw source text. `None` when there is
    /// nothing to look for at all.
    firstpass: Option<Regex>,
}

impl Matcher {
    /// Compile keypath patterns. The `debugger` keyword joins the pre-filter
    /// when debugger statements are being removed.
    pub fn compile<S: AsRef<str>>(patterns: &[S], include_debugger: bool) -> Result<Self> {
        let mut exact = Vec::with_capacity(patterns.len());
        let mut loose = Vec::with_capacity(patterns.len() + 1);
        for pattern in patterns {
            let pattern = pattern.as_ref();
            validate(pattern)?;
            exact.push(compile_segments(pattern, "\\."));
            // Tolerate `a . b`, `a?.b`, `(a).b` and comments between links,
            // which the parser accepts as the same member chain.
            loose.push(compile_segments(
                pattern,
                &format!("{LINK_FILLER}\\??\\.{LINK_FILLER}"),
            ));
        }

        let pattern = if exact.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^(?:{})$", exact.join("|")))?)
        };

        if include_debugger {
            loose.push("debugger".to_string());
        }
        let firstpass = if loose.is_empty() {
            None
        } else {
            // Identifier boundaries rather than `\b`, so patterns starting
            // with `$` are still found.
            Some(Regex::new(&format!(
                "(?:^|{NOT_IDENT})(?:{})(?:$|{NOT_IDENT})",
                loose.join("|")
            ))?)
        };

        Ok(Self { pattern, firstpass })
    }

    /// Whether a flattened keypath matches one of the patterns in full.
    pub fn is_match(&self, keypath: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(keypath))
    }

    /// Cheap textual check run before parsing. May report `true` for inputs
    /// with nothing to strip, never `false` for inputs that have something.
    pub fn may_contain_target(&self, source: &str) -> bool {
        self.firstpass.as_ref().is_some_and(|re| re.is_match(source))
    }
}

fn validate(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(StripError::invalid_pattern(pattern, "pattern is empty"));
    }
    for segment in pattern.split('.') {
        if segment.is_empty() {
            return Err(StripError::invalid_pattern(pattern, "empty segment"));
        }
        if segment == "*" {
            continue;
        }
        if segment.contains('*') {
            return Err(StripError::invalid_pattern(
                pattern,
                format!("`*` must be a whole segment, found `{segment}`"),
            ));
        }
        if segment.chars().any(|c| c.is_whitespace() || "()[]{};,\"'`".contains(c)) {
            return Err(StripError::invalid_pattern(
                pattern,
                format!("`{segment}` is not an identifier"),
            ));
        }
    }
    Ok(())
}

fn compile_segments(pattern: &str, separator: &str) -> String {
    pattern
        .split('.')
        .map(|segment| {
            if segment == "*" {
                WILDCARD.to_string()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Reduce a member chain to its dotted keypath, e.g. `this.log.info` for
/// `this.log.info(x)`'s callee. Returns `None` for computed access anywhere in the chain
/// and for roots other than an identifier, `this` or `super`.
pub fn flatten(node: Node<'_>, source: &str) -> Option<String> {
    let mut parts = Vec::new();
    let mut node = unparenthesize(node);

    while SyntaxKind::of(&node) == SyntaxKind::MemberExpression {
        let property = node.child_by_field_name("property")?;
        if !matches!(
            property.kind(),
            "property_identifier" | "private_property_identifier"
        ) {
            return None;
        }
        parts.push(text(property, source));
        node = unparenthesize(node.child_by_field_name("object")?);
    }

    let root = match SyntaxKind::of(&node) {
        SyntaxKind::Identifier => text(node, source),
        SyntaxKind::This => "this",
        SyntaxKind::Super => "super",
        _ => return None,
    };
    parts.push(root);
    parts.reverse();
    Some(parts.join("."))
}

/// `(a.b)` and `a.b` describe the same chain.
fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while SyntaxKind::of(&node) == SyntaxKind::Parenthesized && node.named_child_count() == 1 {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.start_byte()..node.end_byte()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Dialect, parse_source};

    fn matcher(patterns: &[&str]) -> Matcher {
        Matcher::compile(patterns, true).unwrap()
    }

    /// Flatten the callee of the first call expression in `source`.
    fn callee_keypath(source: &str) -> Option<String> {
        let tree = parse_source(source, Dialect::Javascript).unwrap();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if SyntaxKind::of(&node) == SyntaxKind::CallExpression {
                return flatten(node.child_by_field_name("function")?, source);
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        panic!("no call expression in {source:?}");
    }

    #[test]
    fn flatten_dotted_chain() {
        assert_eq!(callee_keypath("a.b.c();").as_deref(), Some("a.b.c"));
    }

    #[test]
    fn flatten_this_and_super() {
        assert_eq!(callee_keypath("this.x();").as_deref(), Some("this.x"));
        assert_eq!(
            callee_keypath("class A extends B { m() { super.m(); } }").as_deref(),
            Some("super.m")
        );
    }

    #[test]
    fn flatten_bare_identifier() {
        assert_eq!(callee_keypath("foo();").as_deref(), Some("foo"));
    }

    #[test]
    fn flatten_computed_access_is_none() {
        assert_eq!(callee_keypath("console['log']();"), None);
        assert_eq!(callee_keypath("a[0].b();"), None);
        assert_eq!(callee_keypath("a.b[c].d();"), None);
    }

    #[test]
    fn flatten_call_root_is_none() {
        assert_eq!(callee_keypath("foo().x();"), None);
        assert_eq!(callee_keypath("(function () {})();"), None);
    }

    #[test]
    fn flatten_sees_through_parentheses() {
        assert_eq!(callee_keypath("(console.log)(1);").as_deref(), Some("console.log"));
        assert_eq!(callee_keypath("(console).log(1);").as_deref(), Some("console.log"));
    }

    #[test]
    fn flatten_optional_chain() {
        assert_eq!(callee_keypath("console?.log(1);").as_deref(), Some("console.log"));
    }

    #[test]
    fn wildcard_matches_exactly_one_segment() {
        let m = matcher(&["console.*"]);
        assert!(m.is_match("console.log"));
        assert!(m.is_match("console.warn"));
        assert!(!m.is_match("console"));
        assert!(!m.is_match("console.log.extra"));
        assert!(!m.is_match("window.console.log"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let m = matcher(&["console.log"]);
        assert!(m.is_match("console.log"));
        assert!(!m.is_match("Console.log"));
    }

    #[test]
    fn leading_wildcard() {
        let m = matcher(&["*.debug"]);
        assert!(m.is_match("logger.debug"));
        assert!(m.is_match("this.debug"));
        assert!(!m.is_match("a.b.debug"));
    }

    #[test]
    fn literal_dollar_is_escaped() {
        let m = matcher(&["$.ajax"]);
        assert!(m.is_match("$.ajax"));
        assert!(!m.is_match("x.ajax"));
    }

    #[test]
    fn wildcard_does_not_match_dollar_names() {
        let m = matcher(&["console.*"]);
        assert!(!m.is_match("console.$log"));
    }

    #[test]
    fn multiple_patterns_alternate() {
        let m = matcher(&["console.*", "assert.*", "debug"]);
        assert!(m.is_match("assert.equal"));
        assert!(m.is_match("debug"));
        assert!(!m.is_match("debug.x"));
    }

    #[test]
    fn no_patterns_never_match() {
        let m = Matcher::compile::<&str>(&[], false).unwrap();
        assert!(!m.is_match("console.log"));
        assert!(!m.may_contain_target("console.log(1); debugger;"));
    }

    #[test]
    fn prefilter_respects_word_boundaries() {
        let m = matcher(&["console.*"]);
        assert!(m.may_contain_target("console.log(1)"));
        assert!(!m.may_contain_target("xconsole.log(1)"));
        assert!(!m.may_contain_target("let consoles = 1;"));
    }

    #[test]
    fn prefilter_is_looser_than_matcher() {
        let m = matcher(&["console.*"]);
        assert!(m.may_contain_target("console . log(1)"));
        assert!(m.may_contain_target("console?.log(1)"));
        assert!(m.may_contain_target("window.console.log(1)"));
    }

    #[test]
    fn prefilter_finds_dollar_roots() {
        let m = matcher(&["$.ajax"]);
        assert!(m.may_contain_target("$.ajax({ url });"));
        assert!(!m.may_contain_target("x$.ajax({ url });"));
    }

    #[test]
    fn prefilter_finds_parenthesized_roots() {
        let m = matcher(&["console.*"]);
        assert!(m.may_contain_target("(console).log(1)"));
    }

    #[test]
    fn prefilter_finds_chains_split_by_comments() {
        let m = matcher(&["console.*"]);
        assert!(m.may_contain_target("console /* c */ .log(1);"));
        assert!(m.may_contain_target("console\n  // why\n  .log(1);"));
        assert!(m.may_contain_target("console/* a */?./* b */log(1);"));
    }

    #[test]
    fn flatten_ignores_comments_between_links() {
        assert_eq!(
            callee_keypath("console /* c */ .log(1);").as_deref(),
            Some("console.log")
        );
        assert_eq!(
            callee_keypath("console\n  // why\n  .log(1);").as_deref(),
            Some("console.log")
        );
    }

    #[test]
    fn prefilter_debugger_only_when_enabled() {
        let on = Matcher::compile(&["console.*"], true).unwrap();
        let off = Matcher::compile(&["console.*"], false).unwrap();
        assert!(on.may_contain_target("debugger;"));
        assert!(!off.may_contain_target("debugger;"));
        assert!(!on.may_contain_target("debuggerEnabled = true;"));
    }

    #[test]
    fn invalid_patterns_fail_at_compile_time() {
        for bad in ["", "console..log", ".log", "console.", "con*sole.log", "a b.c"] {
            assert!(
                Matcher::compile(&[bad], true).is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wildcard_arity_is_exact(
                head in "[a-z]{1,8}",
                tail in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 0..4),
            ) {
                let m = matcher(&[&format!("{head}.*")]);
                let keypath = std::iter::once(head.clone())
                    .chain(tail.iter().cloned())
                    .collect::<Vec<_>>()
                    .join(".");
                prop_assert_eq!(m.is_match(&keypath), tail.len() == 1);
            }

            #[test]
            fn literal_pattern_matches_only_itself(
                a in "[a-z]{1,6}",
                b in "[a-z]{1,6}",
                other in "[a-z]{1,6}",
            ) {
                let own = format!("{a}.{b}");
                let sibling = format!("{a}.{other}");
                let m = matcher(&[own.as_str()]);
                prop_assert!(m.is_match(&own));
                prop_assume!(other != b);
                prop_assert!(!m.is_match(&sibling));
            }
        }
    }
}
