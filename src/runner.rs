use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::diagnostic::Removal;
use crate::parse::source::SourceFile;
use crate::strip::{Stripper, Transformed};

/// Where transformed files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Report only.
    None,
    /// Overwrite each input.
    InPlace,
    /// Mirror inputs under a directory, relative to the working directory.
    OutDir(PathBuf),
}

/// Thread-safe phase timing counters (nanoseconds) for profiling.
struct PhaseTimers {
    read_ns: AtomicU64,
    transform_ns: AtomicU64,
    write_ns: AtomicU64,
}

impl PhaseTimers {
    fn new() -> Self {
        Self {
            read_ns: AtomicU64::new(0),
            transform_ns: AtomicU64::new(0),
            write_ns: AtomicU64::new(0),
        }
    }

    fn add(counter: &AtomicU64, since: Instant) {
        counter.fetch_add(since.elapsed().as_nanos() as u64, Ordering::Relaxed);
    }

    fn log_summary(&self, total: Duration, file_count: usize) {
        let read = Duration::from_nanos(self.read_ns.load(Ordering::Relaxed));
        let transform = Duration::from_nanos(self.transform_ns.load(Ordering::Relaxed));
        let write = Duration::from_nanos(self.write_ns.load(Ordering::Relaxed));
        log::debug!("--- phase breakdown ({file_count} files) ---");
        log::debug!("  file read:   {read:.0?} (cumulative across threads)");
        log::debug!("  transform:   {transform:.0?}");
        log::debug!("  file write:  {write:.0?}");
        log::debug!("  wall clock:  {total:.0?}");
    }
}

#[derive(Debug)]
pub enum FileStatus {
    Unchanged,
    Changed { removals: Vec<Removal> },
    Failed { error: String },
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    /// One entry per input, in input order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    pub fn file_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn changed_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Changed { .. }))
            .map(|o| o.path.as_path())
            .collect()
    }

    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                FileStatus::Failed { error } => Some((o.path.as_path(), error.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Every removal across the batch, ordered by path then position.
    pub fn removals(&self) -> Vec<&Removal> {
        let mut all: Vec<&Removal> = self
            .outcomes
            .iter()
            .flat_map(|o| match &o.status {
                FileStatus::Changed { removals } => removals.as_slice(),
                _ => &[][..],
            })
            .collect();
        all.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        all
    }

    pub fn has_changes(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.status, FileStatus::Changed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.status, FileStatus::Failed { .. }))
    }
}

/// Transform every file in parallel. A failing file is recorded and the
/// rest of the batch carries on.
pub fn run_batch(files: &[PathBuf], stripper: &Stripper, output: &OutputMode) -> BatchResult {
    let wall_start = Instant::now();
    let timers = log::log_enabled!(log::Level::Debug).then(PhaseTimers::new);

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| {
            let status = match process_file(path, stripper, output, timers.as_ref()) {
                Ok(Some(removals)) => FileStatus::Changed { removals },
                Ok(None) => FileStatus::Unchanged,
                Err(e) => {
                    log::warn!("{}: {e:#}", path.display());
                    FileStatus::Failed {
                        error: format!("{e:#}"),
                    }
                }
            };
            FileOutcome {
                path: path.clone(),
                status,
            }
        })
        .collect();

    if let Some(t) = &timers {
        t.log_summary(wall_start.elapsed(), files.len());
    }

    BatchResult { outcomes }
}

fn process_file(
    path: &Path,
    stripper: &Stripper,
    output: &OutputMode,
    timers: Option<&PhaseTimers>,
) -> Result<Option<Vec<Removal>>> {
    let read_start = Instant::now();
    let source = SourceFile::from_path(path)?;
    if let Some(t) = timers {
        PhaseTimers::add(&t.read_ns, read_start);
    }

    let transform_start = Instant::now();
    let transformed = stripper.transform_source(&source)?;
    if let Some(t) = timers {
        PhaseTimers::add(&t.transform_ns, transform_start);
    }

    let write_start = Instant::now();
    let target = match output {
        OutputMode::None => None,
        OutputMode::InPlace => Some(path.to_path_buf()),
        OutputMode::OutDir(dir) => Some(mirror_path(dir, path)),
    };
    if let Some(target) = target {
        match &transformed {
            Some(t) => write_transformed(&target, t)?,
            // Keep the output directory complete.
            None if target != path => write_file(&target, source.as_str())?,
            None => {}
        }
    }
    if let Some(t) = timers {
        PhaseTimers::add(&t.write_ns, write_start);
    }

    Ok(transformed.map(|t| t.removals))
}

/// Write transformed code, plus a `.map` sidecar and a trailing
/// `sourceMappingURL` comment when a map was produced.
pub fn write_transformed(target: &Path, transformed: &Transformed) -> Result<()> {
    let Some(map_json) = transformed
        .map_json()
        .with_context(|| format!("failed to serialize source map for {}", target.display()))?
    else {
        return write_file(target, &transformed.code);
    };

    let mut map_path = target.as_os_str().to_owned();
    map_path.push(".map");
    let map_path = PathBuf::from(map_path);
    let map_name = map_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut code = transformed.code.clone();
    if !code.is_empty() && !code.ends_with('\n') {
        code.push('\n');
    }
    code.push_str("//# sourceMappingURL=");
    code.push_str(&map_name);
    code.push('\n');

    write_file(target, &code)?;
    write_file(&map_path, &map_json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// `dir` joined with `path` made relative: to the working directory when
/// under it, otherwise with its root and any `..` dropped.
fn mirror_path(dir: &Path, path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_default();
    let rel = path.strip_prefix(&cwd).unwrap_or(path);
    let mut out = dir.to_path_buf();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            out.push(part);
        }
    }
    out
}
