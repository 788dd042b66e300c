#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_highlight::{EngineOptions, HighlightEngine, HighlightEvent, HighlightObserver};
use core_speller::{Speller, SpellerError, WordListSpeller};
use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

pub const EN_WORDS: &[&str] = &[
    "hello", "world", "the", "cat", "sat", "on", "mat", "a", "is", "this", "sentence",
];
pub const DE_WORDS: &[&str] = &["die", "katze", "sitzt", "auf", "der", "matte", "hallo", "welt"];

pub type Log = Rc<RefCell<Vec<HighlightEvent>>>;

pub struct Recorder(pub Log);

impl HighlightObserver for Recorder {
    fn on_event(&mut self, event: &HighlightEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

pub fn english() -> WordListSpeller {
    WordListSpeller::new().with_language("en_US", EN_WORDS.iter().copied())
}

pub fn bilingual() -> WordListSpeller {
    english().with_language("de_DE", DE_WORDS.iter().copied())
}

/// Manual mode, English, no language detection.
pub fn manual_options() -> EngineOptions {
    EngineOptions::default()
        .with_language("en_US")
        .with_auto_detect_disabled(true)
}

pub fn automatic_options() -> EngineOptions {
    manual_options().with_automatic(true)
}

pub fn engine_with<S: Speller>(speller: S, options: EngineOptions) -> (HighlightEngine<S>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut engine = HighlightEngine::new(speller, options);
    engine.register_observer(Recorder(log.clone()));
    (engine, log)
}

pub fn drain(log: &Log) -> Vec<HighlightEvent> {
    log.borrow_mut().drain(..).collect()
}

pub fn spans<S: Speller>(engine: &HighlightEngine<S>) -> Vec<Range<usize>> {
    engine.misspelled_ranges().iter().map(|r| r.range()).collect()
}

/// Word-list speller wrapper that counts correctness queries and can be
/// switched into a failing state.
pub struct ScriptedSpeller {
    pub inner: WordListSpeller,
    pub calls: Cell<usize>,
    pub down: bool,
}

impl ScriptedSpeller {
    pub fn new(inner: WordListSpeller) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            down: false,
        }
    }

    fn check_up(&self) -> Result<(), SpellerError> {
        if self.down {
            Err(SpellerError::Backend("scripted outage".into()))
        } else {
            Ok(())
        }
    }
}

impl Speller for ScriptedSpeller {
    fn is_correct(&self, word: &str, language: &str) -> Result<bool, SpellerError> {
        self.calls.set(self.calls.get() + 1);
        self.check_up()?;
        self.inner.is_correct(word, language)
    }

    fn suggestions(
        &self,
        word: &str,
        language: &str,
        max: Option<usize>,
    ) -> Result<Vec<String>, SpellerError> {
        self.check_up()?;
        self.inner.suggestions(word, language, max)
    }

    fn detect_language(&self, text: &str) -> Option<String> {
        self.inner.detect_language(text)
    }

    fn add_to_personal_dictionary(&mut self, word: &str) -> Result<(), SpellerError> {
        self.check_up()?;
        self.inner.add_to_personal_dictionary(word)
    }

    fn ignore_for_session(&mut self, word: &str) -> Result<(), SpellerError> {
        self.inner.ignore_for_session(word)
    }

    fn is_available(&self, language: &str) -> bool {
        self.inner.is_available(language)
    }
}
