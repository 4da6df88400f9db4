pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod edit;
pub mod error;
pub mod formatter;
pub mod fs;
pub mod keypath;
pub mod parse;
pub mod runner;
pub mod strip;
pub mod walker;

#[cfg(test)]
pub mod testutil;

use std::io::{Read, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use cli::Args;
use config::{StripOptions, load_config};
use formatter::create_formatter;
use fs::discover_files;
use parse::source::SourceFile;
use runner::run_batch;
use strip::Stripper;

/// Run the CLI. Returns the exit code: 0 = success, 1 = `--check` found
/// changes, 2 = one or more files failed.
pub fn run(args: Args) -> Result<i32> {
    let config_start = Instant::now();
    let loaded = load_config(args.config.as_deref())?;
    match &loaded.path {
        Some(path) => log::debug!("config loaded from: {}", path.display()),
        None => log::debug!("no config file found, using defaults"),
    }
    let options = StripOptions::from(loaded.file.merge(args.overrides()));
    let stripper = Stripper::new(options).context("invalid configuration")?;
    log::debug!("options: {:?}", stripper.options());
    log::debug!("config loading total: {:.0?}", config_start.elapsed());

    // --stdin: transform a single input and print it
    if let Some(ref id) = args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        let source = SourceFile::from_string(id.clone(), input);
        return match stripper.transform_source(&source) {
            Ok(transformed) => {
                let changed = transformed.is_some();
                let code = transformed.map_or_else(|| source.content.clone(), |t| t.code);
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(code.as_bytes())?;
                stdout.flush()?;
                Ok(if args.check && changed { 1 } else { 0 })
            }
            Err(e) => {
                eprintln!("error: {e}");
                Ok(2)
            }
        };
    }

    let files = discover_files(&args.paths, stripper.filter())?;
    log::debug!("{} files to process", files.len());

    // --list-target-files: print the files that would be processed and exit
    if args.list_target_files {
        for file in &files {
            println!("{}", file.display());
        }
        return Ok(0);
    }

    let output = args.output_mode();
    let result = run_batch(&files, &stripper, &output);
    let formatter = create_formatter(&args.format);
    formatter.print(&result);

    if result.has_failures() {
        Ok(2)
    } else if args.check && result.has_changes() {
        Ok(1)
    } else {
        Ok(0)
    }
}
