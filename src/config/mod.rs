use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::keypath::DEFAULT_FUNCTIONS;
use crate::parse::ParserOptions;

pub const CONFIG_FILE_NAME: &str = ".jsstrip.yml";

pub const DEFAULT_INCLUDE: &[&str] = &[
    "**/*.js", "**/*.mjs", "**/*.cjs", "**/*.jsx", "**/*.ts", "**/*.tsx",
];

/// One layer of settings: the config file, or overrides from the command
/// line. Every key is optional; unset keys fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub functions: Option<Vec<String>>,
    pub debugger: Option<bool>,
    pub source_map: Option<bool>,
    pub parser: Option<ParserOptions>,
}

impl FileConfig {
    /// Layer `over` on top of `self`; keys set in `over` win.
    pub fn merge(self, over: FileConfig) -> FileConfig {
        FileConfig {
            include: over.include.or(self.include),
            exclude: over.exclude.or(self.exclude),
            functions: over.functions.or(self.functions),
            debugger: over.debugger.or(self.debugger),
            source_map: over.source_map.or(self.source_map),
            parser: over.parser.or(self.parser),
        }
    }
}

/// Fully resolved options for a [`crate::strip::Stripper`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Keypath patterns; `*` stands for exactly one identifier segment.
    pub functions: Vec<String>,
    pub debugger: bool,
    pub source_map: bool,
    pub parser: ParserOptions,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            functions: DEFAULT_FUNCTIONS.iter().map(|s| s.to_string()).collect(),
            debugger: true,
            source_map: true,
            parser: ParserOptions::default(),
        }
    }
}

impl From<FileConfig> for StripOptions {
    fn from(config: FileConfig) -> Self {
        let defaults = StripOptions::default();
        Self {
            include: config.include.unwrap_or(defaults.include),
            exclude: config.exclude.unwrap_or(defaults.exclude),
            functions: config.functions.unwrap_or(defaults.functions),
            debugger: config.debugger.unwrap_or(defaults.debugger),
            source_map: config.source_map.unwrap_or(defaults.source_map),
            parser: config.parser.unwrap_or(defaults.parser),
        }
    }
}

/// A config file as found on disk.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub file: FileConfig,
    /// Where it was read from; `None` when built-in defaults apply.
    pub path: Option<PathBuf>,
}

/// Load config from the given path, or look for `.jsstrip.yml` in the
/// current directory. Returns an empty config if the file doesn't exist.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !config_path.exists() {
        log::debug!("no config file at {}", config_path.display());
        return Ok(LoadedConfig::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    // An empty file deserializes as null; treat it like an empty mapping.
    let file: FileConfig = if contents.trim().is_empty() {
        FileConfig::default()
    } else {
        serde_yml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?
    };

    log::debug!("config loaded from {}", config_path.display());
    Ok(LoadedConfig {
        file,
        path: Some(config_path),
    })
}
