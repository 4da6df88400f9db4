use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column (character offset within the line)
    pub column: usize,
}

/// What was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemovalKind {
    Debugger,
    Call { keypath: String },
}

impl fmt::Display for RemovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalKind::Debugger => write!(f, "debugger statement"),
            RemovalKind::Call { keypath } => write!(f, "call to {keypath}()"),
        }
    }
}

/// The syntactic slot a removed node occupied, which decides the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Member of a program or `{}` block: deleted outright.
    BlockMember,
    /// Sole statement of an `if`/loop/label body: replaced by `void 0;`.
    StatementBody,
    /// Used as a value: replaced by `void 0`.
    Expression,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::BlockMember => "deleted",
            Slot::StatementBody => "replaced with `void 0;`",
            Slot::Expression => "replaced with `void 0`",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub path: String,
    pub location: Location,
    pub kind: RemovalKind,
    pub slot: Slot,
}

impl Removal {
    pub fn sort_key(&self) -> (&str, usize, usize) {
        (&self.path, self.location.line, self.location.column)
    }
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {}",
            self.path,
            self.location.line,
            self.location.column,
            self.kind,
            self.slot.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removal(path: &str, line: usize, kind: RemovalKind, slot: Slot) -> Removal {
        Removal {
            path: path.to_string(),
            location: Location { line, column: 2 },
            kind,
            slot,
        }
    }

    #[test]
    fn removal_display() {
        let r = removal(
            "app.js",
            3,
            RemovalKind::Call {
                keypath: "console.log".to_string(),
            },
            Slot::BlockMember,
        );
        assert_eq!(format!("{r}"), "app.js:3:2: call to console.log() deleted");

        let r = removal("app.js", 4, RemovalKind::Debugger, Slot::StatementBody);
        assert_eq!(
            format!("{r}"),
            "app.js:4:2: debugger statement replaced with `void 0;`"
        );
    }

    #[test]
    fn removal_sort_key() {
        let a = removal("a.js", 1, RemovalKind::Debugger, Slot::BlockMember);
        let b = removal("a.js", 2, RemovalKind::Debugger, Slot::BlockMember);
        let c = removal("b.js", 1, RemovalKind::Debugger, Slot::BlockMember);
        assert!(a.sort_key() < b.sort_key());
        assert!(b.sort_key() < c.sort_key());
    }

    #[test]
    fn kind_serializes_with_tag() {
        let json = serde_json::to_value(RemovalKind::Call {
            keypath: "assert.ok".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "call");
        assert_eq!(json["keypath"], "assert.ok");
        assert_eq!(
            serde_json::to_value(Slot::StatementBody).unwrap(),
            "statement_body"
        );
    }
}
