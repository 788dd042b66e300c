//! Break-point segmentation from Unicode general category data.
//!
//! Contract:
//! - Input: a text snapshot (`&str`). Nothing here holds state or performs I/O.
//! - Output: a `BreakSequence`, i.e. strictly increasing code point offsets
//!   (not byte offsets) starting at 0. Empty text yields an empty sequence,
//!   never `[0]`.
//! - The three granularities are independent passes over the same text; no
//!   sequence is derived from another.
//!
//! The grapheme policy is a coarse approximation rather than UAX #29: every
//! letter except a modifier letter starts a new cluster, so modifier letters
//! stay attached to the letter before them. Callers rely on that exact shape.
//!
//! Word and sentence breaks sit *on* separator code points. Pairing
//! consecutive offsets therefore yields runs that begin with the separator;
//! `word_spans` trims it and drops runs that are separator-only.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Ordered code point offsets into the snapshot they were computed from.
pub type BreakSequence = Vec<usize>;

/// One checkable word: `[start, end)` in code points plus the owned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl WordSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when `offset` lies inside the span or directly after its last character.
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn is_mark(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
    )
}

fn is_punct(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// Code points that end a word: whitespace, combining marks, punctuation.
pub fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || is_mark(c) || is_punct(c)
}

/// Code points that end a sentence: combining marks, punctuation, paragraph separators.
pub fn is_sentence_separator(c: char) -> bool {
    is_mark(c) || is_punct(c) || get_general_category(c) == GeneralCategory::ParagraphSeparator
}

fn is_grapheme_start(c: char) -> bool {
    is_letter(c) && get_general_category(c) != GeneralCategory::ModifierLetter
}

fn collect_breaks(text: &str, is_break: impl Fn(char) -> bool) -> BreakSequence {
    let mut breaks = Vec::new();
    if text.is_empty() {
        return breaks;
    }
    breaks.push(0);
    for (i, c) in text.chars().enumerate() {
        // offset 0 is already present; a qualifying first char must not repeat it
        if i > 0 && is_break(c) {
            breaks.push(i);
        }
    }
    breaks
}

/// 0 plus the offset of every letter that is not a modifier letter.
pub fn grapheme_breaks(text: &str) -> BreakSequence {
    collect_breaks(text, is_grapheme_start)
}

/// 0 plus the offset of every whitespace, combining mark or punctuation code point.
pub fn word_breaks(text: &str) -> BreakSequence {
    collect_breaks(text, is_word_separator)
}

/// 0 plus the offset of every combining mark, punctuation or paragraph separator.
pub fn sentence_breaks(text: &str) -> BreakSequence {
    collect_breaks(text, is_sentence_separator)
}

/// Pair consecutive word breaks into `WordSpan`s (offsets relative to `text`).
///
/// Leading separators are trimmed from each run and separator-only runs are
/// skipped, so the result never overlaps and never contains an empty span.
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    let breaks = word_breaks(text);
    if breaks.is_empty() {
        return Vec::new();
    }
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map_or(text.len(), |(b, _)| *b);
    let mut spans = Vec::new();
    for (i, &run_start) in breaks.iter().enumerate() {
        let run_end = breaks.get(i + 1).copied().unwrap_or(chars.len());
        let mut start = run_start;
        while start < run_end && is_word_separator(chars[start].1) {
            start += 1;
        }
        if start >= run_end {
            continue;
        }
        spans.push(WordSpan {
            start,
            end: run_end,
            text: text[byte_at(start)..byte_at(run_end)].to_string(),
        });
    }
    spans
}

/// Word containing `offset`, preferring a span that starts at or before it and
/// ends after it; a cursor sitting right after a word still resolves to that word.
pub fn word_at(text: &str, offset: usize) -> Option<WordSpan> {
    let spans = word_spans(text);
    if let Some(inside) = spans.iter().find(|s| s.start <= offset && offset < s.end) {
        return Some(inside.clone());
    }
    spans.into_iter().find(|s| s.end == offset)
}
