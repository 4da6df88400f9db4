use std::io::Write;

use crate::formatter::Formatter;
use crate::runner::BatchResult;

/// One changed path per line, for piping into other tools.
pub struct FilesFormatter;

impl Formatter for FilesFormatter {
    fn format_to(&self, result: &BatchResult, out: &mut dyn Write) {
        let mut paths = result.changed_paths();
        paths.sort();
        paths.dedup();
        for path in paths {
            let _ = writeln!(out, "{}", path.display());
        }
    }
}
