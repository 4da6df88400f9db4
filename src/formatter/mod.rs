pub mod files;
pub mod json;
pub mod quiet;
pub mod text;

use std::io::Write;

use crate::runner::BatchResult;

pub trait Formatter {
    fn format_to(&self, result: &BatchResult, out: &mut dyn Write);

    fn print(&self, result: &BatchResult) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(result, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        "quiet" => Box::new(quiet::QuietFormatter),
        "files" => Box::new(files::FilesFormatter),
        // "text" and any unknown value
        _ => Box::new(text::TextFormatter),
    }
}

/// `3 files inspected, 2 removals in 1 file` plus a failure count when
/// there is one.
fn summary_line(result: &BatchResult) -> String {
    let file_count = result.file_count();
    let removal_count = result.removals().len();
    let changed_count = result.changed_paths().len();
    let failed_count = result.failures().len();

    let mut line = format!(
        "{file_count} {} inspected, {removal_count} {} in {changed_count} {}",
        plural(file_count, "file", "files"),
        plural(removal_count, "removal", "removals"),
        plural(changed_count, "file", "files"),
    );
    if failed_count > 0 {
        line.push_str(&format!(", {failed_count} failed"));
    }
    line
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
