use std::collections::BTreeSet;

use sourcemap::{SourceMap, SourceMapBuilder};

use crate::parse::source::SourceFile;

/// A single source-level edit: replace byte range [start..end) with replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset, inclusive.
    pub start: usize,
    /// Byte offset, exclusive.
    pub end: usize,
    /// Replacement text (empty string = deletion).
    pub replacement: String,
}

impl Edit {
    fn is_deletion(&self) -> bool {
        self.replacement.is_empty()
    }
}

/// A set of non-overlapping edits, sorted by start offset.
///
/// Overlapping deletions are merged into one. Any other overlap drops the
/// later edit, so the first request for a range wins.
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn from_vec(mut raw: Vec<Edit>) -> Self {
        raw.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut accepted: Vec<Edit> = Vec::with_capacity(raw.len());
        for e in raw {
            if let Some(last) = accepted.last_mut() {
                if e.start < last.end {
                    if last.is_deletion() && e.is_deletion() {
                        last.end = last.end.max(e.end);
                    } else {
                        log::debug!(
                            "dropping edit [{}, {}) overlapping [{}, {})",
                            e.start,
                            e.end,
                            last.start,
                            last.end
                        );
                    }
                    continue;
                }
            }
            accepted.push(e);
        }

        Self { edits: accepted }
    }

    /// Apply edits to source text, returning new text.
    ///
    /// Single linear scan: copy the unchanged text before each edit, then
    /// its replacement, then whatever follows the last edit.
    pub fn apply(&self, source: &str) -> String {
        let mut result = String::with_capacity(source.len());
        let mut cursor = 0;
        for e in &self.edits {
            result.push_str(&source[cursor..e.start]);
            result.push_str(&e.replacement);
            cursor = e.end;
        }
        result.push_str(&source[cursor..]);
        result
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }
}

/// Accumulates edits against one source text and materialises them into the
/// new text and, optionally, a source map back to the original.
pub struct TextEditor<'s> {
    source: &'s SourceFile,
    edits: Vec<Edit>,
    /// Original offsets that get a mapping of their own when they survive.
    marks: BTreeSet<usize>,
}

impl<'s> TextEditor<'s> {
    pub fn new(source: &'s SourceFile) -> Self {
        Self {
            source,
            edits: Vec::new(),
            marks: BTreeSet::new(),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source.as_str()
    }

    pub fn source_file(&self) -> &'s SourceFile {
        self.source
    }

    pub fn remove(&mut self, start: usize, end: usize) {
        self.edits.push(Edit {
            start,
            end,
            replacement: String::new(),
        });
    }

    pub fn overwrite(&mut self, start: usize, end: usize, replacement: &str) {
        debug_assert!(!replacement.is_empty(), "use remove() for deletions");
        self.edits.push(Edit {
            start,
            end,
            replacement: replacement.to_string(),
        });
    }

    pub fn mark(&mut self, offset: usize) {
        self.marks.insert(offset);
    }

    pub fn is_edited(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Produce the edited text. With `map_file` set, also build a source map
    /// whose single source is the original text under `source_name`.
    pub fn finish(self, map_file: Option<(&str, &str)>) -> (String, Option<SourceMap>) {
        let set = EditSet::from_vec(self.edits);
        let Some((file, source_name)) = map_file else {
            return (set.apply(self.source.as_str()), None);
        };

        let mut out = MappedOutput::new(self.source, file, source_name);
        let text = self.source.as_str();
        let mut cursor = 0;
        for e in set.edits() {
            out.push_original(cursor, e.start, &self.marks);
            if !e.replacement.is_empty() {
                // Replacement text maps back to the start of what it replaced.
                out.map_to(e.start);
                out.push_str(&e.replacement);
            }
            cursor = e.end;
        }
        out.push_original(cursor, text.len(), &self.marks);
        let (code, map) = out.finish();
        (code, Some(map))
    }
}

/// Output text under construction, tracking its own line and UTF-16 column
/// so mappings can be recorded as text is appended.
struct MappedOutput<'s> {
    source: &'s SourceFile,
    code: String,
    line: u32,
    col: u32,
    builder: SourceMapBuilder,
    source_id: u32,
}

impl<'s> MappedOutput<'s> {
    fn new(source: &'s SourceFile, file: &str, source_name: &str) -> Self {
        let mut builder = SourceMapBuilder::new(Some(file));
        let source_id = builder.add_source(source_name);
        builder.set_source_contents(source_id, Some(source.as_str()));
        Self {
            source,
            code: String::with_capacity(source.as_str().len()),
            line: 0,
            col: 0,
            builder,
            source_id,
        }
    }

    fn map_to(&mut self, original_offset: usize) {
        let (src_line, src_col) = self.source.offset_to_utf16_position(original_offset);
        self.builder.add_raw(
            self.line,
            self.col,
            src_line,
            src_col,
            Some(self.source_id),
            None,
        );
    }

    fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += ch.len_utf16() as u32;
            }
        }
        self.code.push_str(text);
    }

    /// Copy original text [start..end), mapping its first byte and every
    /// marked offset inside it.
    fn push_original(&mut self, start: usize, end: usize, marks: &BTreeSet<usize>) {
        if start >= end {
            return;
        }
        let text = self.source.as_str();
        let mut piece_start = start;
        for &mark in marks.range(start + 1..end) {
            self.map_to(piece_start);
            self.push_str(&text[piece_start..mark]);
            piece_start = mark;
        }
        self.map_to(piece_start);
        self.push_str(&text[piece_start..end]);
    }

    fn finish(self) -> (String, SourceMap) {
        (self.code, self.builder.into_sourcemap())
    }
}
