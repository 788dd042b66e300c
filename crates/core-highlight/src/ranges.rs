//! The set of ranges currently marked misspelled.
//!
//! Ranges are kept sorted by start and never overlap. Coordinates are live:
//! every reported edit shifts them before anything is rechecked.

use core_text::EditDelta;
use std::ops::Range;

/// A maximal word whose last verdict was "misspelled".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisspelledRange {
    pub start: usize,
    pub end: usize,
    /// Document text of `[start, end)` when the verdict was recorded.
    pub word: String,
}

impl MisspelledRange {
    pub fn new(start: usize, end: usize, word: impl Into<String>) -> Self {
        Self {
            start,
            end,
            word: word.into(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn intersects(&self, span: &Range<usize>) -> bool {
        self.start < span.end && self.end > span.start
    }
}

#[derive(Debug, Default, Clone)]
pub struct RangeSet {
    ranges: Vec<MisspelledRange>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn as_slice(&self) -> &[MisspelledRange] {
        &self.ranges
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.ranges.iter().any(|r| r.word == word)
    }

    /// The range covering exactly `span`, if any.
    pub fn exact(&self, span: &Range<usize>) -> Option<&MisspelledRange> {
        self.ranges
            .iter()
            .find(|r| r.start == span.start && r.end == span.end)
    }

    /// The range containing `offset`, end inclusive.
    pub fn touching(&self, offset: usize) -> Option<&MisspelledRange> {
        self.ranges
            .iter()
            .find(|r| r.start <= offset && offset <= r.end)
    }

    pub fn insert(&mut self, range: MisspelledRange) {
        let at = self.ranges.partition_point(|r| r.start < range.start);
        self.ranges.insert(at, range);
    }

    /// Move every range into post-edit coordinates.
    ///
    /// Ranges before the edit keep their offsets, ranges after it move by the
    /// net length change, ranges wholly inside the removed text are dropped.
    /// A range straddling the edit is stretched or clipped to what survived;
    /// it always lies inside the word span the caller rechecks next. Returns
    /// the number of dropped ranges.
    pub fn apply_edit(&mut self, delta: EditDelta) -> usize {
        let p = delta.position;
        let removed_end = p + delta.removed;
        let before = self.ranges.len();
        self.ranges.retain_mut(|r| {
            if r.end <= p {
                return true;
            }
            if r.start >= removed_end {
                r.start = r.start + delta.added - delta.removed;
                r.end = r.end + delta.added - delta.removed;
                return true;
            }
            if r.start >= p && r.end <= removed_end {
                return false;
            }
            let start = if r.start < p { r.start } else { p + delta.added };
            let end = if r.end > removed_end {
                r.end + delta.added - delta.removed
            } else {
                p
            };
            r.start = start;
            r.end = end;
            start < end
        });
        self.ranges.sort_by_key(|r| r.start);
        before - self.ranges.len()
    }

    /// Remove and return every range intersecting `span`.
    pub fn take_within(&mut self, span: &Range<usize>) -> Vec<MisspelledRange> {
        let (taken, kept): (Vec<_>, Vec<_>) =
            self.ranges.drain(..).partition(|r| r.intersects(span));
        self.ranges = kept;
        taken
    }

    /// Remove and return every range whose text equals `word`.
    pub fn take_word(&mut self, word: &str) -> Vec<MisspelledRange> {
        let (taken, kept): (Vec<_>, Vec<_>) =
            self.ranges.drain(..).partition(|r| r.word == word);
        self.ranges = kept;
        taken
    }

    pub fn take_all(&mut self) -> Vec<MisspelledRange> {
        std::mem::take(&mut self.ranges)
    }
}
