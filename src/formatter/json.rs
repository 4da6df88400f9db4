use std::io::Write;

use serde::Serialize;

use crate::diagnostic::{RemovalKind, Slot};
use crate::formatter::Formatter;
use crate::runner::BatchResult;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    metadata: Metadata,
    removals: Vec<RemovalEntry>,
    failures: Vec<Failure>,
}

#[derive(Serialize)]
struct Metadata {
    files_inspected: usize,
    changed_count: usize,
    removal_count: usize,
    failed_count: usize,
}

#[derive(Serialize)]
struct RemovalEntry {
    path: String,
    line: usize,
    column: usize,
    #[serde(flatten)]
    kind: RemovalKind,
    slot: Slot,
}

#[derive(Serialize)]
struct Failure {
    path: String,
    error: String,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, result: &BatchResult, out: &mut dyn Write) {
        let removals: Vec<RemovalEntry> = result
            .removals()
            .into_iter()
            .map(|r| RemovalEntry {
                path: r.path.clone(),
                line: r.location.line,
                column: r.location.column,
                kind: r.kind.clone(),
                slot: r.slot,
            })
            .collect();
        let failures: Vec<Failure> = result
            .failures()
            .into_iter()
            .map(|(path, error)| Failure {
                path: path.display().to_string(),
                error: error.to_string(),
            })
            .collect();

        let output = JsonOutput {
            metadata: Metadata {
                files_inspected: result.file_count(),
                changed_count: result.changed_paths().len(),
                removal_count: removals.len(),
                failed_count: failures.len(),
            },
            removals,
            failures,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => {
                let _ = writeln!(out, "{json}");
            }
            Err(e) => log::error!("failed to serialize report: {e}"),
        }
    }
}
