use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::diagnostic::Location;

#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    /// Byte offsets where each line starts (0-indexed into content)
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_string(path.to_path_buf(), content))
    }

    /// Create a SourceFile from a string, using the given path for display purposes.
    pub fn from_string(path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(content.as_bytes());
        Self {
            path,
            content,
            line_starts,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }

    /// Convert a byte offset into a (1-indexed line, 0-indexed column) pair.
    /// Column is a character offset (UTF-8 codepoint count) within the line.
    pub fn offset_to_line_col(&self, byte_offset: usize) -> (usize, usize) {
        let (line_idx, line_start) = self.line_of(byte_offset);
        let line_bytes = &self.content.as_bytes()[line_start..byte_offset];
        // Count bytes that are NOT UTF-8 continuation bytes (0x80..0xBF).
        let col = line_bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count();
        (line_idx + 1, col)
    }

    /// Same as [`offset_to_line_col`](Self::offset_to_line_col) but 0-indexed
    /// on both axes, with the column counted in UTF-16 code units. This is
    /// the coordinate system of JavaScript source maps.
    pub fn offset_to_utf16_position(&self, byte_offset: usize) -> (u32, u32) {
        let (line_idx, line_start) = self.line_of(byte_offset);
        let col: usize = self.content[line_start..byte_offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        (line_idx as u32, col as u32)
    }

    pub fn location(&self, byte_offset: usize) -> Location {
        let (line, column) = self.offset_to_line_col(byte_offset);
        Location { line, column }
    }

    fn line_of(&self, byte_offset: usize) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        (line_idx, self.line_starts[line_idx])
    }
}

fn compute_line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &byte) in content.iter().enumerate() {
        if byte == b'\n' && i + 1 < content.len() {
            starts.push(i + 1);
        }
    }
    starts
}
