//! The speller port: the word-correctness oracle the highlight engine consults.
//!
//! The engine treats every call as synchronous and possibly failing. A failed
//! call means "correctness unknown" to the caller; nothing here is fatal.
//!
//! `WordListSpeller` is the in-tree backend: plain word lists (one word per
//! line, hunspell `.dic` files accepted) keyed by language code.

use thiserror::Error;

mod detect;
mod suggest;
mod wordlist;

pub use detect::{MIN_DETECT_RATIO, MIN_DETECT_WORDS};
pub use wordlist::WordListSpeller;

/// Default number of suggestions a host asks for.
pub const DEFAULT_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum SpellerError {
    #[error("no dictionary available for language `{language}`")]
    Unavailable { language: String },
    #[error("speller backend failure: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Word-correctness oracle.
pub trait Speller {
    fn is_correct(&self, word: &str, language: &str) -> Result<bool, SpellerError>;

    /// Replacement candidates, best first. `max = None` asks for everything
    /// the backend can produce.
    fn suggestions(
        &self,
        word: &str,
        language: &str,
        max: Option<usize>,
    ) -> Result<Vec<String>, SpellerError>;

    /// Best guess at the language of `text`, `None` when undecided.
    fn detect_language(&self, text: &str) -> Option<String>;

    fn add_to_personal_dictionary(&mut self, word: &str) -> Result<(), SpellerError>;

    fn ignore_for_session(&mut self, word: &str) -> Result<(), SpellerError>;

    fn is_available(&self, language: &str) -> bool;
}

impl<T: Speller + ?Sized> Speller for Box<T> {
    fn is_correct(&self, word: &str, language: &str) -> Result<bool, SpellerError> {
        (**self).is_correct(word, language)
    }
    fn suggestions(
        &self,
        word: &str,
        language: &str,
        max: Option<usize>,
    ) -> Result<Vec<String>, SpellerError> {
        (**self).suggestions(word, language, max)
    }
    fn detect_language(&self, text: &str) -> Option<String> {
        (**self).detect_language(text)
    }
    fn add_to_personal_dictionary(&mut self, word: &str) -> Result<(), SpellerError> {
        (**self).add_to_personal_dictionary(word)
    }
    fn ignore_for_session(&mut self, word: &str) -> Result<(), SpellerError> {
        (**self).ignore_for_session(word)
    }
    fn is_available(&self, language: &str) -> bool {
        (**self).is_available(language)
    }
}
