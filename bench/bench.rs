//! Benchmark jsstrip on a synthetic corpus.
//!
//! Usage:
//!   cargo run --release --bin bench_jsstrip                       # default corpus
//!   cargo run --release --bin bench_jsstrip -- --files 5000 --runs 5
//!   cargo run --release --bin bench_jsstrip -- --output bench/results.md

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use jsstrip::config::StripOptions;
use jsstrip::runner::{OutputMode, run_batch};
use jsstrip::strip::Stripper;

// --- CLI ---

#[derive(Parser)]
#[command(about = "Benchmark jsstrip on a generated corpus. Prints a markdown table.")]
struct Args {
    /// Number of files in the corpus
    #[arg(long, default_value_t = 2000)]
    files: usize,

    /// Functions per file
    #[arg(long, default_value_t = 40)]
    functions: usize,

    /// Timed runs per scenario
    #[arg(long, default_value_t = 3)]
    runs: u32,

    /// Also write the table to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

// --- Corpus ---

fn corpus_dir() -> PathBuf {
    std::env::temp_dir().join("jsstrip_bench_corpus")
}

/// One module with a mix of removable calls, debugger statements and
/// plain code. `seed` varies the mix so files are not identical.
fn synth_module(seed: usize, functions: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "import {{ api }} from './api_{}';\n", seed % 17);
    for i in 0..functions {
        let _ = writeln!(out, "export function handler{i}(req, res) {{");
        let _ = writeln!(out, "  const id = req.params.id + {i};");
        match (seed + i) % 5 {
            0 => {
                let _ = writeln!(out, "  console.log('handler{i}', id);");
            }
            1 => {
                let _ = writeln!(out, "  if (!id) console.warn('missing id');");
            }
            2 => {
                let _ = writeln!(out, "  assert.ok(id > 0, 'positive');\n  debugger;");
            }
            3 => {
                let _ = writeln!(out, "  const v = console.error(id) || api.fallback(id);");
            }
            _ => {
                let _ = writeln!(out, "  window.console.log(id);");
            }
        }
        let _ = writeln!(out, "  return api.get(id).then((r) => res.send(r.body));");
        let _ = writeln!(out, "}}\n");
    }
    out
}

/// Write a fresh corpus. Returns the files and total bytes.
fn setup_corpus(dir: &Path, files: usize, functions: usize) -> std::io::Result<(Vec<PathBuf>, usize)> {
    let _ = fs::remove_dir_all(dir);
    let mut paths = Vec::with_capacity(files);
    let mut bytes = 0;
    for n in 0..files {
        let sub = dir.join(format!("pkg{}", n % 32));
        fs::create_dir_all(&sub)?;
        let path = sub.join(format!("module{n}.js"));
        let code = synth_module(n, functions);
        bytes += code.len();
        fs::write(&path, code)?;
        paths.push(path);
    }
    paths.sort();
    Ok((paths, bytes))
}

// --- Timing ---

fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.2}s")
    } else {
        let ms = seconds * 1000.0;
        format!("{ms:.0}ms")
    }
}

/// Median wall time over `runs` runs of the batch, in seconds.
fn time_batch(files: &[PathBuf], options: StripOptions, runs: u32) -> (f64, usize) {
    let stripper = match Stripper::new(options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut samples = Vec::with_capacity(runs as usize);
    let mut removals = 0;
    for _ in 0..runs.max(1) {
        let start = Instant::now();
        let result = run_batch(files, &stripper, &OutputMode::None);
        samples.push(start.elapsed().as_secs_f64());
        removals = result.removals().len();
    }
    samples.sort_by(f64::total_cmp);
    (samples[samples.len() / 2], removals)
}

fn main() {
    let args = Args::parse();
    let dir = corpus_dir();

    eprintln!("Generating {} files under {}...", args.files, dir.display());
    let (files, bytes) = match setup_corpus(&dir, args.files, args.functions) {
        Ok(corpus) => corpus,
        Err(e) => {
            eprintln!("error: failed to write corpus: {e}");
            std::process::exit(1);
        }
    };

    let scenarios: Vec<(&str, StripOptions)> = vec![
        ("default", StripOptions::default()),
        (
            "no source map",
            StripOptions {
                source_map: false,
                ..StripOptions::default()
            },
        ),
        (
            "no match (prefilter only)",
            StripOptions {
                functions: vec!["tracer.*".to_string()],
                debugger: false,
                ..StripOptions::default()
            },
        ),
    ];

    let mut table = String::new();
    let _ = writeln!(
        table,
        "| Scenario | Files | Size | Removals | Median | MB/s |\n|---|---:|---:|---:|---:|---:|"
    );
    for (name, options) in scenarios {
        eprintln!("Timing: {name}");
        let (secs, removals) = time_batch(&files, options, args.runs);
        let mb = bytes as f64 / 1_000_000.0;
        let _ = writeln!(
            table,
            "| {name} | {} | {mb:.1} MB | {removals} | {} | {:.0} |",
            files.len(),
            format_time(secs),
            if secs > 0.0 { mb / secs } else { 0.0 },
        );
    }

    print!("{table}");
    if let Some(path) = args.output {
        if let Err(e) = fs::write(&path, &table) {
            eprintln!("error: failed to write {}: {e}", path.display());
        }
    }
    let _ = fs::remove_dir_all(&dir);
}
