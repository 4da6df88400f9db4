use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::Result;

/// Include/exclude glob filter over input paths. Paths are matched relative
/// to `base` when they live under it.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
    include_all: bool,
    base: PathBuf,
}

impl PathFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S], base: &Path) -> Result<Self> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            include_all: include.is_empty(),
            base: base.to_path_buf(),
        })
    }

    /// Whether a discovered path should be transformed: not excluded, and
    /// included (an empty include list includes everything).
    pub fn should_process(&self, path: &Path) -> bool {
        let rel = self.relative(path);
        !self.exclude.is_match(rel) && (self.include_all || self.include.is_match(rel))
    }

    /// Files named explicitly on the command line skip `include`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.is_match(self.relative(path))
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        let path = path.strip_prefix(&self.base).unwrap_or(path);
        path.strip_prefix(".").unwrap_or(path)
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(builder.build()?)
}
