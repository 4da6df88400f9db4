use std::path::PathBuf;

use clap::Parser;

use crate::config::FileConfig;
use crate::parse::{Dialect, ParserOptions};
use crate::runner::OutputMode;

#[derive(Parser, Debug)]
#[command(
    name = "jsstrip",
    version,
    about = "Strip console/assert calls and debugger statements from JavaScript and TypeScript"
)]
pub struct Args {
    /// Files or directories to process
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file [default: .jsstrip.yml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keypath patterns to remove, replacing the configured list (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "PATTERNS")]
    pub functions: Option<Vec<String>>,

    /// Keep `debugger` statements
    #[arg(long)]
    pub no_debugger: bool,

    /// Do not produce source maps
    #[arg(long)]
    pub no_source_map: bool,

    /// Grammar to parse inputs with
    #[arg(long, value_name = "DIALECT", value_parser = ["auto", "javascript", "typescript", "tsx"])]
    pub dialect: Option<String>,

    /// Rewrite files in place
    #[arg(short, long, conflicts_with = "out_dir")]
    pub write: bool,

    /// Write transformed files under DIR instead of in place
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Read source from stdin, use PATH as its identifier, print the result
    #[arg(long, value_name = "PATH")]
    pub stdin: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json", "files", "quiet"])]
    pub format: String,

    /// Print files that would be processed, then exit
    #[arg(short = 'L', long)]
    pub list_target_files: bool,

    /// Exit with status 1 if any file would change
    #[arg(long)]
    pub check: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Settings given on the command line, as a layer over the config file.
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            functions: self.functions.clone(),
            debugger: self.no_debugger.then_some(false),
            source_map: self.no_source_map.then_some(false),
            parser: self
                .dialect
                .as_deref()
                .and_then(|s| s.parse::<Dialect>().ok())
                .map(|dialect| ParserOptions { dialect }),
            ..FileConfig::default()
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if let Some(dir) = &self.out_dir {
            OutputMode::OutDir(dir.clone())
        } else if self.write {
            OutputMode::InPlace
        } else {
            OutputMode::None
        }
    }
}
