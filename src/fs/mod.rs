pub mod filter;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use filter::PathFilter;

/// Discover input files from the given paths, respecting .gitignore and
/// the include/exclude filter.
pub fn discover_files(paths: &[PathBuf], filter: &PathFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            // Direct file paths bypass include, but not exclude
            if filter.is_excluded(path) {
                log::debug!("{}: excluded", path.display());
            } else {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            let dir_files = walk_directory(path, filter)?;
            files.extend(dir_files);
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(dir: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking directory")?;
        let path = entry.path();
        if path.is_file() && filter.should_process(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
