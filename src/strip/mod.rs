//! The per-input transform: pre-filter, parse, plan removals, apply them.

mod eliminator;
mod planner;

use std::path::{Path, PathBuf};

use sourcemap::SourceMap;

use crate::config::StripOptions;
use crate::diagnostic::Removal;
use crate::edit::TextEditor;
use crate::error::{Result, StripError};
use crate::fs::filter::PathFilter;
use crate::keypath::Matcher;
use crate::parse::parse_source;
use crate::parse::source::SourceFile;
use crate::walker::walk;

use eliminator::Eliminator;
use planner::RemovalPlanner;

/// The result of a transform that changed something.
#[derive(Debug)]
pub struct Transformed {
    pub code: String,
    /// Maps `code` back to the input. Present when source maps are enabled.
    pub map: Option<SourceMap>,
    pub removals: Vec<Removal>,
}

impl Transformed {
    /// The source map serialised as JSON.
    pub fn map_json(&self) -> Result<Option<String>> {
        let Some(map) = &self.map else {
            return Ok(None);
        };
        let mut buf = Vec::new();
        map.to_writer(&mut buf)?;
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Compiled options, shared read-only across every input.
#[derive(Debug)]
pub struct Stripper {
    options: StripOptions,
    matcher: Matcher,
    filter: PathFilter,
}

impl Stripper {
    pub fn new(options: StripOptions) -> Result<Self> {
        let matcher = Matcher::compile(options.functions.as_slice(), options.debugger)?;
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let filter = PathFilter::new(options.include.as_slice(), options.exclude.as_slice(), &base)?;
        Ok(Self {
            options,
            matcher,
            filter,
        })
    }

    pub fn options(&self) -> &StripOptions {
        &self.options
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Transform one input identified by `id`. Inputs rejected by the
    /// include/exclude filter come back unchanged.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<Transformed>> {
        if !self.filter.should_process(Path::new(id)) {
            log::trace!("{id}: filtered out");
            return Ok(None);
        }
        let source = SourceFile::from_string(PathBuf::from(id), code.to_string());
        self.transform_source(&source)
    }

    /// Transform an already-selected source file, skipping the path filter.
    pub fn transform_source(&self, source: &SourceFile) -> Result<Option<Transformed>> {
        let id = source.path_str();
        let text = source.as_str();
        if !self.matcher.may_contain_target(text) {
            return Ok(None);
        }

        let dialect = self.options.parser.dialect.resolve(id);
        let tree = parse_source(text, dialect).map_err(|e| StripError::parse(id, e))?;

        let eliminator = Eliminator::new(TextEditor::new(source), id);
        let mut planner = RemovalPlanner::new(
            &self.matcher,
            self.options.debugger,
            self.options.source_map,
            text,
            eliminator,
        );
        walk(&tree, &mut planner);

        let eliminator = planner.into_eliminator();
        if !eliminator.is_edited() {
            return Ok(None);
        }
        let (editor, mut removals) = eliminator.finish();
        removals.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let file_name = source
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());
        let map_names = self
            .options
            .source_map
            .then_some((file_name.as_str(), id));
        let (code, map) = editor.finish(map_names);
        Ok(Some(Transformed { code, map, removals }))
    }
}
