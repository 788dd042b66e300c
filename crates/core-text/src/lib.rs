//! Rope-backed document and the text access traits the highlight engine reads through.
//!
//! All offsets in this crate are code point (char) indices into the live
//! document, matching the offsets produced by `segment`.

use anyhow::{Context, Result};
use ropey::Rope;
use std::ops::Range;
use std::path::Path;

pub mod segment;

pub use segment::{BreakSequence, WordSpan};

/// A single mutation reported by the host: at `position`, `removed` chars were
/// replaced by `added` chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDelta {
    pub position: usize,
    pub added: usize,
    pub removed: usize,
}

impl EditDelta {
    pub fn new(position: usize, added: usize, removed: usize) -> Self {
        Self {
            position,
            added,
            removed,
        }
    }

    /// Net change in document length.
    pub fn shift(&self) -> isize {
        self.added as isize - self.removed as isize
    }
}

/// Read access to the live document.
///
/// Reads are clamped: out-of-range offsets produce `None` or a shorter slice,
/// never a panic, so stale offsets degrade to empty results.
pub trait TextSource {
    fn len_chars(&self) -> usize;
    fn char_at(&self, idx: usize) -> Option<char>;
    fn slice(&self, range: Range<usize>) -> String;
}

/// Write access used for in-place replacement of a word.
pub trait TextSink: TextSource {
    /// Replace `range` (clamped) with `text` and report the resulting delta.
    fn replace(&mut self, range: Range<usize>, text: &str) -> EditDelta;
}

fn widen<D, F>(doc: &D, range: Range<usize>, is_boundary: F) -> Range<usize>
where
    D: TextSource + ?Sized,
    F: Fn(char) -> bool,
{
    let len = doc.len_chars();
    let mut start = range.start.min(len);
    let mut end = range.end.min(len).max(start);
    while start > 0 && doc.char_at(start - 1).is_some_and(|c| !is_boundary(c)) {
        start -= 1;
    }
    while end < len && doc.char_at(end).is_some_and(|c| !is_boundary(c)) {
        end += 1;
    }
    start..end
}

/// Grow `range` outward until both ends sit on a word separator or the
/// document edge. An offset inside a word yields the whole word; an offset in
/// a separator gap yields an empty range.
pub fn word_bounds<D: TextSource + ?Sized>(doc: &D, range: Range<usize>) -> Range<usize> {
    widen(doc, range, segment::is_word_separator)
}

/// Grow `range` outward to the enclosing sentence separators.
pub fn sentence_bounds<D: TextSource + ?Sized>(doc: &D, range: Range<usize>) -> Range<usize> {
    widen(doc, range, segment::is_sentence_separator)
}

/// A text document backed by a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct Document {
    rope: Rope,
    pub name: String,
}

impl Document {
    /// Construct a document from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Read a UTF-8 file into a document named after the file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("file");
        Ok(Self::from_str(name, &content))
    }

    /// Full document contents as an owned `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert `text` at `position` (clamped to the end).
    pub fn insert(&mut self, position: usize, text: &str) -> EditDelta {
        let pos = position.min(self.rope.len_chars());
        self.rope.insert(pos, text);
        EditDelta::new(pos, text.chars().count(), 0)
    }

    /// Remove `range` (clamped); an empty or inverted range is a zero delta.
    pub fn remove(&mut self, range: Range<usize>) -> EditDelta {
        let range = self.clamp(range);
        self.rope.remove(range.clone());
        EditDelta::new(range.start, 0, range.len())
    }

    /// Zero-based `(line, column)` of a char offset, columns counted in chars.
    pub fn line_col(&self, idx: usize) -> (usize, usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        (line, idx - self.rope.line_to_char(line))
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        start..end
    }
}

impl TextSource for Document {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.rope.get_char(idx)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.rope.slice(range).to_string()
    }
}

impl TextSink for Document {
    fn replace(&mut self, range: Range<usize>, text: &str) -> EditDelta {
        let range = self.clamp(range);
        self.rope.remove(range.clone());
        self.rope.insert(range.start, text);
        EditDelta::new(range.start, text.chars().count(), range.len())
    }
}

/// Plain strings are handy snapshots for tests and one-shot checks.
impl TextSource for str {
    fn len_chars(&self) -> usize {
        self.chars().count()
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.chars().nth(idx)
    }

    fn slice(&self, range: Range<usize>) -> String {
        if range.start >= range.end {
            return String::new();
        }
        self.chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }
}
