use std::io::Write;

use crate::formatter::{Formatter, summary_line};
use crate::runner::BatchResult;

/// Prints nothing unless something changed or failed.
pub struct QuietFormatter;

impl Formatter for QuietFormatter {
    fn format_to(&self, result: &BatchResult, out: &mut dyn Write) {
        if !result.has_changes() && !result.has_failures() {
            return;
        }
        let _ = writeln!(out, "{}", summary_line(result));
    }
}
