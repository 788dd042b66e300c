//! The highlight engine: keeps the misspelled range set in step with a live
//! document and publishes every markup change to its observers.
//!
//! The engine holds no copy of the document. Each operation that needs text
//! borrows the host's `TextSource`, and all work is bounded by the span the
//! operation touches, apart from an explicit rehighlight.

use crate::cursor::CursorContext;
use crate::options::EngineOptions;
use crate::policy::{DensityPolicy, Verdict};
use crate::ranges::{MisspelledRange, RangeSet};
use core_events::{ActiveReason, HighlightEvent, HighlightObserver, ObserverSet};
use core_speller::Speller;
use core_text::segment::word_spans;
use core_text::{EditDelta, TextSink, TextSource, sentence_bounds, word_bounds};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, info, trace, warn};

/// Snapshot of the engine's switches and counters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub active: bool,
    pub automatic: bool,
    pub auto_detect_disabled: bool,
    pub current_language: String,
    pub checked_word_count: u32,
    pub error_count: u32,
}

pub struct HighlightEngine<S: Speller> {
    speller: S,
    observers: ObserverSet,
    ranges: RangeSet,
    policy: DensityPolicy,
    language: String,
    active: bool,
    automatic: bool,
    auto_detect_disabled: bool,
    skip_uppercase: bool,
    checker_enabled_by_default: bool,
    ignored: HashSet<String>,
    cursor: CursorContext,
    /// Next offset of a chunked rehighlight still in progress.
    pending_rehighlight: Option<usize>,
}

impl<S: Speller> HighlightEngine<S> {
    pub fn new(mut speller: S, options: EngineOptions) -> Self {
        let mut ignored = HashSet::new();
        for word in options.session_ignore {
            if let Err(e) = speller.ignore_for_session(&word) {
                warn!(target: "highlight", error = %e, "ignore_list_rejected");
            }
            ignored.insert(word);
        }
        info!(
            target: "highlight",
            language = %options.language,
            active = options.active,
            automatic = options.automatic,
            ignored = ignored.len(),
            "engine_created"
        );
        Self {
            speller,
            observers: ObserverSet::new(),
            ranges: RangeSet::new(),
            policy: DensityPolicy::new(options.min_sample_words, options.max_error_ratio),
            language: options.language,
            active: options.active,
            automatic: options.automatic,
            auto_detect_disabled: options.auto_detect_disabled,
            skip_uppercase: options.skip_uppercase,
            checker_enabled_by_default: options.checker_enabled_by_default,
            ignored,
            cursor: CursorContext::default(),
            pending_rehighlight: None,
        }
    }

    pub fn register_observer<O: HighlightObserver + 'static>(&mut self, observer: O) {
        self.observers.register(observer);
    }

    pub fn speller(&self) -> &S {
        &self.speller
    }

    pub fn speller_mut(&mut self) -> &mut S {
        &mut self.speller
    }

    pub fn misspelled_ranges(&self) -> &[MisspelledRange] {
        self.ranges.as_slice()
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            active: self.active,
            automatic: self.automatic,
            auto_detect_disabled: self.auto_detect_disabled,
            current_language: self.language.clone(),
            checked_word_count: self.policy.checked(),
            error_count: self.policy.errors(),
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn automatic(&self) -> bool {
        self.automatic
    }

    pub fn auto_detect_language_disabled(&self) -> bool {
        self.auto_detect_disabled
    }

    pub fn current_language(&self) -> &str {
        &self.language
    }

    pub fn checker_enabled_by_default(&self) -> bool {
        self.checker_enabled_by_default
    }

    /// Whether a backend exists for the current language.
    pub fn spell_checker_found(&self) -> bool {
        self.speller.is_available(&self.language)
    }

    pub fn cursor(&self) -> CursorContext {
        self.cursor
    }

    pub fn rehighlight_pending(&self) -> bool {
        self.pending_rehighlight.is_some()
    }

    fn checking_enabled(&self) -> bool {
        self.active && self.spell_checker_found()
    }

    fn emit(&mut self, event: HighlightEvent) {
        self.observers.dispatch(event);
    }

    // ---------------------------------------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------------------------------------

    /// The host changed the document: at `position`, `removed` chars were
    /// replaced by `added` chars. `doc` is the post-edit text.
    pub fn contents_change<D: TextSource + ?Sized>(
        &mut self,
        doc: &D,
        position: usize,
        added: usize,
        removed: usize,
    ) {
        let delta = EditDelta::new(position, added, removed);
        let dropped = self.ranges.apply_edit(delta);
        let span = word_bounds(doc, position..position + added);
        self.shift_pending(delta, &span);
        debug!(
            target: "highlight.edit",
            position,
            added,
            removed,
            span_start = span.start,
            span_end = span.end,
            dropped,
            "contents_change"
        );

        if !self.auto_detect_disabled && self.detect_around(doc, &span) {
            // the language switch already rechecked the whole document
            return;
        }
        if !self.checking_enabled() {
            return;
        }
        self.recheck(doc, span);
        self.slot_auto_detection(doc);
    }

    fn shift_pending(&mut self, delta: EditDelta, span: &Range<usize>) {
        let Some(next) = self.pending_rehighlight else {
            return;
        };
        let p = delta.position;
        let mut moved = if next <= p {
            next
        } else if next >= p + delta.removed {
            next + delta.added - delta.removed
        } else {
            p + delta.added
        };
        // the edit recheck covers its own span
        if span.start < moved && moved < span.end {
            moved = span.end;
        }
        self.pending_rehighlight = Some(moved);
    }

    fn detect_around<D: TextSource + ?Sized>(&mut self, doc: &D, span: &Range<usize>) -> bool {
        let sentence = sentence_bounds(doc, span.clone());
        if sentence.is_empty() {
            return false;
        }
        let text = doc.slice(sentence);
        self.autodetect_language(doc, &text)
    }

    /// Ask the speller for the language of `sentence`; on a confident guess
    /// that differs from the current language, switch to it. Returns whether
    /// the language changed.
    pub fn autodetect_language<D: TextSource + ?Sized>(&mut self, doc: &D, sentence: &str) -> bool {
        if self.auto_detect_disabled {
            return false;
        }
        let Some(guess) = self.speller.detect_language(sentence) else {
            return false;
        };
        if guess == self.language || !self.speller.is_available(&guess) {
            return false;
        }
        info!(target: "highlight.lang", from = %self.language, to = %guess, "language_detected");
        self.set_current_language(doc, &guess);
        true
    }

    fn should_check(&self, word: &str) -> bool {
        if word.chars().any(|c| c.is_numeric()) {
            return false;
        }
        if self.skip_uppercase
            && word.chars().any(char::is_alphabetic)
            && !word.chars().any(char::is_lowercase)
        {
            return false;
        }
        !self.ignored.contains(word)
    }

    /// Re-verify every word in `span` (which must sit on word boundaries) and
    /// publish the difference against the ranges previously recorded there.
    fn recheck<D: TextSource + ?Sized>(&mut self, doc: &D, span: Range<usize>) {
        let mut old = self.ranges.take_within(&span);
        let mut events = Vec::new();
        if self.checking_enabled() && !span.is_empty() {
            let text = doc.slice(span.clone());
            for word in word_spans(&text) {
                let start = span.start + word.start;
                let end = span.start + word.end;
                if !self.should_check(&word.text) {
                    continue;
                }
                let exact = old.iter().position(|r| r.start == start && r.end == end);
                match self.speller.is_correct(&word.text, &self.language) {
                    Ok(true) => {
                        self.policy.record(true);
                        trace!(target: "highlight", start, end, "word_correct");
                    }
                    Ok(false) => {
                        self.policy.record(false);
                        match exact {
                            Some(idx) => {
                                old.swap_remove(idx);
                            }
                            None => events.push(HighlightEvent::Highlight(start..end)),
                        }
                        self.ranges.insert(MisspelledRange::new(start, end, word.text));
                    }
                    Err(e) => {
                        debug!(target: "highlight", error = %e, start, end, "check_failed");
                        // correctness unknown: carry over whatever verdict covered this word
                        let prior = exact.or_else(|| {
                            old.iter().position(|r| r.start < end && r.end > start)
                        });
                        if let Some(idx) = prior {
                            let previous = old.swap_remove(idx);
                            if previous.range() != (start..end) {
                                events.push(HighlightEvent::Unhighlight(previous.range()));
                                events.push(HighlightEvent::Highlight(start..end));
                            }
                            self.ranges.insert(MisspelledRange::new(start, end, word.text));
                        }
                    }
                }
            }
        }
        events.extend(old.into_iter().map(|r| HighlightEvent::Unhighlight(r.range())));
        events.sort_by_key(|e| match e {
            HighlightEvent::Unhighlight(r) => (r.start, 0),
            HighlightEvent::Highlight(r) => (r.start, 1),
            _ => (usize::MAX, 2),
        });
        for event in events {
            self.emit(event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Full rechecks
    // ---------------------------------------------------------------------------------------------

    /// Start a whole-document recheck to be driven by `rehighlight_step`.
    /// Scheduling again restarts from the beginning.
    pub fn schedule_rehighlight(&mut self) {
        self.pending_rehighlight = Some(0);
    }

    /// Recheck up to `max_words` words of a scheduled rehighlight. Returns
    /// `true` once nothing is pending.
    pub fn rehighlight_step<D: TextSource + ?Sized>(&mut self, doc: &D, max_words: usize) -> bool {
        let Some(next) = self.pending_rehighlight else {
            return true;
        };
        let len = doc.len_chars();
        let next = next.min(len);
        let end = chunk_end(doc, next, max_words.max(1));
        // past-the-end stragglers fall in the final chunk
        let span = if end >= len { next..usize::MAX } else { next..end };
        self.recheck(doc, span);
        if end >= len {
            self.pending_rehighlight = None;
            debug!(target: "highlight", ranges = self.ranges.len(), "rehighlight_done");
            self.slot_auto_detection(doc);
            true
        } else {
            self.pending_rehighlight = Some(end);
            false
        }
    }

    /// Recheck the whole document now.
    pub fn slot_rehighlight<D: TextSource + ?Sized>(&mut self, doc: &D) {
        self.schedule_rehighlight();
        self.rehighlight_step(doc, usize::MAX);
    }

    // ---------------------------------------------------------------------------------------------
    // Switches
    // ---------------------------------------------------------------------------------------------

    /// Manually switch checking on or off. Ignored in automatic mode; returns
    /// whether the switch took effect.
    pub fn set_active<D: TextSource + ?Sized>(&mut self, doc: &D, active: bool) -> bool {
        if self.automatic {
            debug!(target: "highlight.auto", requested = active, "set_active_ignored_automatic");
            return false;
        }
        if self.active == active {
            return true;
        }
        self.active = active;
        info!(target: "highlight", active, "active_changed");
        self.emit(HighlightEvent::active_changed(active, ActiveReason::Manual));
        if active {
            self.slot_rehighlight(doc);
        } else {
            self.clear_markup();
        }
        true
    }

    pub fn set_automatic<D: TextSource + ?Sized>(&mut self, doc: &D, automatic: bool) {
        if self.automatic == automatic {
            return;
        }
        self.automatic = automatic;
        info!(target: "highlight.auto", automatic, "automatic_changed");
        self.slot_auto_detection(doc);
    }

    pub fn set_auto_detect_language_disabled(&mut self, disabled: bool) {
        self.auto_detect_disabled = disabled;
    }

    /// Switch the checking language and recheck everything. In automatic
    /// mode a language change re-arms checking.
    pub fn set_current_language<D: TextSource + ?Sized>(&mut self, doc: &D, language: &str) {
        if self.language == language {
            return;
        }
        self.language = language.to_string();
        self.policy.reset();
        info!(
            target: "highlight.lang",
            language,
            available = self.spell_checker_found(),
            "language_changed"
        );
        self.emit(HighlightEvent::LanguageChanged(self.language.clone()));
        if self.automatic && !self.active {
            self.active = true;
            self.emit(HighlightEvent::active_changed(true, ActiveReason::Rearmed));
        }
        self.slot_rehighlight(doc);
    }

    /// Apply the density policy when in automatic mode.
    pub fn slot_auto_detection<D: TextSource + ?Sized>(&mut self, doc: &D) {
        if !self.automatic {
            return;
        }
        let checked = self.policy.checked();
        let errors = self.policy.errors();
        match self.policy.evaluate() {
            Verdict::InsufficientSample => {}
            Verdict::TooManyErrors if self.active => {
                self.active = false;
                info!(target: "highlight.auto", checked, errors, "auto_disabled");
                self.clear_markup();
                self.emit(HighlightEvent::active_changed(false, ActiveReason::TooManyErrors));
            }
            Verdict::Acceptable if !self.active => {
                self.active = true;
                info!(target: "highlight.auto", checked, errors, "auto_enabled");
                self.emit(HighlightEvent::active_changed(true, ActiveReason::Rearmed));
                self.slot_rehighlight(doc);
            }
            Verdict::TooManyErrors | Verdict::Acceptable => {}
        }
    }

    fn clear_markup(&mut self) {
        self.pending_rehighlight = None;
        for range in self.ranges.take_all() {
            self.emit(HighlightEvent::Unhighlight(range.range()));
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Cursor and queries
    // ---------------------------------------------------------------------------------------------

    pub fn set_cursor_position<D: TextSource + ?Sized>(&mut self, doc: &D, position: usize) {
        self.cursor = CursorContext::new(position, position, position, doc.len_chars());
    }

    pub fn set_cursor<D: TextSource + ?Sized>(
        &mut self,
        doc: &D,
        cursor: usize,
        selection_start: usize,
        selection_end: usize,
    ) {
        self.cursor = CursorContext::new(cursor, selection_start, selection_end, doc.len_chars());
    }

    /// The word containing (or ending at) the cursor, empty in a gap.
    pub fn word_at_cursor<D: TextSource + ?Sized>(&self, doc: &D) -> String {
        word_around(doc, self.cursor.cursor_position)
    }

    /// The word under the selection start, or under the cursor when nothing
    /// is selected.
    pub fn word_under_mouse<D: TextSource + ?Sized>(&self, doc: &D) -> String {
        word_around(doc, self.cursor.anchor())
    }

    /// Whether the word at the cursor is currently marked misspelled.
    pub fn word_is_misspelled<D: TextSource + ?Sized>(&self, doc: &D) -> bool {
        let offset = self.cursor.cursor_position;
        if offset > doc.len_chars() {
            return false;
        }
        let span = word_bounds(doc, offset..offset);
        !span.is_empty() && self.ranges.exact(&span).is_some()
    }

    /// Whether some range currently marked misspelled has exactly this text.
    pub fn is_word_misspelled(&self, word: &str) -> bool {
        self.ranges.contains_word(word)
    }

    /// Replacement candidates for the misspelled word at `position`; empty
    /// when that word is not marked or the speller cannot answer.
    pub fn suggestions<D: TextSource + ?Sized>(
        &self,
        doc: &D,
        position: usize,
        max: Option<usize>,
    ) -> Vec<String> {
        let span = word_bounds(doc, position..position);
        if span.is_empty() || self.ranges.exact(&span).is_none() {
            return Vec::new();
        }
        let word = doc.slice(span);
        match self.speller.suggestions(&word, &self.language, max) {
            Ok(list) => list,
            Err(e) => {
                debug!(target: "highlight", error = %e, "suggestions_failed");
                Vec::new()
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Corrections
    // ---------------------------------------------------------------------------------------------

    /// Accept `word` for the rest of the session.
    pub fn ignore_word(&mut self, word: &str) {
        if let Err(e) = self.speller.ignore_for_session(word) {
            warn!(target: "highlight", error = %e, "ignore_word_failed");
        }
        self.accept(word);
    }

    /// Add `word` to the personal dictionary.
    pub fn add_word_to_dictionary(&mut self, word: &str) {
        if let Err(e) = self.speller.add_to_personal_dictionary(word) {
            warn!(target: "highlight", error = %e, "add_word_failed");
        }
        self.accept(word);
    }

    fn accept(&mut self, word: &str) {
        self.ignored.insert(word.to_string());
        for range in self.ranges.take_word(word) {
            self.emit(HighlightEvent::Unhighlight(range.range()));
        }
    }

    /// Replace the word at the cursor with `replacement`.
    pub fn replace_word<D: TextSink + ?Sized>(&mut self, doc: &mut D, replacement: &str) -> bool {
        let position = self.cursor.cursor_position;
        self.replace_word_at(doc, position, replacement)
    }

    /// Replace the word at `position` with `replacement`, recheck the edit and
    /// ask the host to select the new text. Returns `false` when no word is
    /// there.
    pub fn replace_word_at<D: TextSink + ?Sized>(
        &mut self,
        doc: &mut D,
        position: usize,
        replacement: &str,
    ) -> bool {
        let target = word_bounds(&*doc, position..position);
        if target.is_empty() {
            return false;
        }
        let delta = doc.replace(target.clone(), replacement);
        debug!(target: "highlight.edit", start = target.start, removed = delta.removed, added = delta.added, "replace_word");
        self.contents_change(&*doc, delta.position, delta.added, delta.removed);
        for range in self.ranges.take_word(replacement) {
            self.emit(HighlightEvent::Unhighlight(range.range()));
        }
        self.emit(HighlightEvent::CursorChangeRequested(
            delta.position..delta.position + delta.added,
        ));
        true
    }
}

fn word_around<D: TextSource + ?Sized>(doc: &D, offset: usize) -> String {
    if offset > doc.len_chars() {
        return String::new();
    }
    let span = word_bounds(doc, offset..offset);
    if span.is_empty() {
        String::new()
    } else {
        doc.slice(span)
    }
}

/// End offset of a chunk starting at `start` holding at most `max_words`
/// words. Always a word boundary.
fn chunk_end<D: TextSource + ?Sized>(doc: &D, start: usize, max_words: usize) -> usize {
    let len = doc.len_chars();
    if max_words == usize::MAX {
        return len;
    }
    let mut words = 0;
    let mut in_word = false;
    for idx in start..len {
        let sep = doc
            .char_at(idx)
            .is_none_or(core_text::segment::is_word_separator);
        if sep && in_word && words >= max_words {
            return idx;
        }
        if !sep && !in_word {
            words += 1;
        }
        in_word = !sep;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_speller::WordListSpeller;
    use core_text::Document;
    use pretty_assertions::assert_eq;

    fn engine() -> HighlightEngine<WordListSpeller> {
        let speller = WordListSpeller::new().with_language("en_US", ["hello", "world", "the", "cat"]);
        HighlightEngine::new(speller, EngineOptions::default().with_auto_detect_disabled(true))
    }

    #[test]
    fn chunk_end_stops_after_word_budget() {
        let s = "one two three four";
        assert_eq!(chunk_end(s, 0, 2), 7);
        assert_eq!(chunk_end(s, 7, 1), 13);
        assert_eq!(chunk_end(s, 13, 5), 18);
        assert_eq!(chunk_end(s, 0, usize::MAX), 18);
    }

    #[test]
    fn digits_and_ignored_words_are_not_checked() {
        let mut e = engine();
        e.ignore_word("zorp");
        let doc = Document::from_str("t", "zorp abc123 hello");
        e.slot_rehighlight(&doc);
        assert!(e.misspelled_ranges().is_empty());
        assert_eq!(e.state().checked_word_count, 1);
    }

    #[test]
    fn uppercase_skipped_only_when_enabled() {
        let doc = Document::from_str("t", "KDE cat");
        let mut e = engine();
        e.slot_rehighlight(&doc);
        assert_eq!(e.misspelled_ranges().len(), 1);

        let speller = WordListSpeller::new().with_language("en_US", ["cat"]);
        let mut opts = EngineOptions::default().with_auto_detect_disabled(true);
        opts.skip_uppercase = true;
        let mut e = HighlightEngine::new(speller, opts);
        e.slot_rehighlight(&doc);
        assert!(e.misspelled_ranges().is_empty());
    }

    #[test]
    fn stale_cursor_queries_are_empty() {
        let mut e = engine();
        let long = Document::from_str("t", "Helllo wrold");
        e.slot_rehighlight(&long);
        e.set_cursor_position(&long, 10);
        let short = Document::from_str("t", "Hi");
        assert_eq!(e.word_at_cursor(&short), "");
        assert_eq!(e.word_under_mouse(&short), "");
        assert!(!e.word_is_misspelled(&short));
    }

    #[test]
    fn missing_backend_checks_nothing() {
        let mut e = engine();
        let doc = Document::from_str("t", "Helllo wrold");
        e.set_current_language(&doc, "xx_XX");
        assert!(!e.spell_checker_found());
        assert!(e.misspelled_ranges().is_empty());
        assert!(e.suggestions(&doc, 2, None).is_empty());
    }
}
