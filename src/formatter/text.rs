use std::io::Write;

use crate::formatter::{Formatter, summary_line};
use crate::runner::BatchResult;

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, result: &BatchResult, out: &mut dyn Write) {
        for r in result.removals() {
            let _ = writeln!(out, "{r}");
        }
        for (path, error) in result.failures() {
            let _ = writeln!(out, "{}: error: {error}", path.display());
        }
        let _ = writeln!(out, "\n{}", summary_line(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_batch;

    fn render(result: &BatchResult) -> String {
        let mut buf = Vec::new();
        TextFormatter.format_to(result, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn lists_removals_then_failures_then_summary() {
        let out = render(&sample_batch());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "a.js:1:0: call to console.log() deleted");
        assert_eq!(lines[1], "a.js:3:4: debugger statement replaced with `void 0;`");
        assert_eq!(lines[2], "c.js: error: unexpected `)` (1:12) in c.js");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "3 files inspected, 2 removals in 1 file, 1 failed");
    }

    #[test]
    fn empty_batch_prints_summary_only() {
        assert_eq!(
            render(&BatchResult::default()),
            "\n0 files inspected, 0 removals in 0 files\n"
        );
    }
}
