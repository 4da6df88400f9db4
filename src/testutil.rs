use std::path::PathBuf;

use crate::config::StripOptions;
use crate::diagnostic::{Location, Removal, RemovalKind, Slot};
use crate::runner::{BatchResult, FileOutcome, FileStatus};
use crate::strip::Stripper;

/// Transform `code` as `id`, returning the new text or `None` if unchanged.
/// Panics on invalid options or parse errors.
pub fn strip(code: &str, id: &str, options: StripOptions) -> Option<String> {
    let stripper = Stripper::new(options).expect("options should compile");
    stripper
        .transform(code, id)
        .unwrap_or_else(|e| panic!("transform of {id} failed: {e}"))
        .map(|t| t.code)
}

/// Transform with default options as `in.js`.
pub fn strip_default(code: &str) -> Option<String> {
    strip(code, "in.js", StripOptions::default())
}

/// Default options with one tweak.
pub fn options_with(tweak: impl FnOnce(&mut StripOptions)) -> StripOptions {
    let mut options = StripOptions::default();
    tweak(&mut options);
    options
}

/// Three files: `a.js` with two removals, `b.js` unchanged, `c.js` failed.
pub fn sample_batch() -> BatchResult {
    BatchResult {
        outcomes: vec![
            FileOutcome {
                path: PathBuf::from("a.js"),
                status: FileStatus::Changed {
                    removals: vec![
                        Removal {
                            path: "a.js".to_string(),
                            location: Location { line: 3, column: 4 },
                            kind: RemovalKind::Debugger,
                            slot: Slot::StatementBody,
                        },
                        Removal {
                            path: "a.js".to_string(),
                            location: Location { line: 1, column: 0 },
                            kind: RemovalKind::Call {
                                keypath: "console.log".to_string(),
                            },
                            slot: Slot::BlockMember,
                        },
                    ],
                },
            },
            FileOutcome {
                path: PathBuf::from("b.js"),
                status: FileStatus::Unchanged,
            },
            FileOutcome {
                path: PathBuf::from("c.js"),
                status: FileStatus::Failed {
                    error: "unexpected `)` (1:12) in c.js".to_string(),
                },
            },
        ],
    }
}
