//! Word-list backed speller.
//!
//! Dictionaries are loaded from a directory of `<language>.dic` files. Lines
//! are trimmed; empty lines and `#` comments are skipped; a hunspell style
//! leading word count and `/FLAGS` suffixes are tolerated and discarded.
//!
//! Case policy: an entry matches itself, its capitalised form and its
//! ALL-CAPS form. A capitalised entry (`Paris`) also matches `PARIS` but never
//! `paris`.

use crate::suggest;
use crate::{Speller, SpellerError, detect};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Minimum length of each half when accepting run-together words.
const RUN_TOGETHER_MIN_PART: usize = 2;

#[derive(Debug, Default, Clone)]
pub(crate) struct Dictionary {
    words: HashSet<String>,
    alphabet: Vec<char>,
}

impl Dictionary {
    fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dict = Dictionary::default();
        dict.extend(words);
        dict
    }

    fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut alphabet: BTreeSet<char> = self.alphabet.iter().copied().collect();
        for word in words {
            let word = word.into();
            alphabet.extend(word.chars().flat_map(char::to_lowercase));
            self.words.insert(word);
        }
        self.alphabet = alphabet.into_iter().collect();
    }

    pub(crate) fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    /// Exact, capitalised or ALL-CAPS match against an entry.
    pub(crate) fn has_variant(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        let lower = word.to_lowercase();
        if lower == word {
            return false;
        }
        let all_upper = word == word.to_uppercase();
        let mut chars = word.chars();
        let capitalised = chars.next().is_some_and(char::is_uppercase)
            && chars.as_str() == chars.as_str().to_lowercase();
        if (capitalised || all_upper) && self.words.contains(&lower) {
            return true;
        }
        all_upper && self.words.contains(&suggest::capitalise(&lower))
    }

    fn splits_into_two(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < RUN_TOGETHER_MIN_PART * 2 {
            return false;
        }
        (RUN_TOGETHER_MIN_PART..=chars.len() - RUN_TOGETHER_MIN_PART).any(|at| {
            let left: String = chars[..at].iter().collect();
            let right: String = chars[at..].iter().collect();
            self.has_variant(&left) && self.has_variant(&right)
        })
    }
}

/// Speller over in-memory word lists, one per language.
#[derive(Debug, Default)]
pub struct WordListSpeller {
    dictionaries: BTreeMap<String, Dictionary>,
    personal: HashSet<String>,
    ignored: HashSet<String>,
    personal_path: Option<PathBuf>,
    skip_run_together: bool,
    preferred: Vec<String>,
}

impl WordListSpeller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or extend) the word list for `language`.
    pub fn with_language<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_language(language, words);
        self
    }

    pub fn add_language<I, S>(&mut self, language: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.dictionaries.get_mut(language) {
            Some(dict) => dict.extend(words),
            None => {
                self.dictionaries
                    .insert(language.to_string(), Dictionary::from_words(words));
            }
        }
    }

    /// Load every `<language>.dic` file in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut speller = Self::new();
        let entries =
            fs::read_dir(dir).with_context(|| format!("reading dictionaries in {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("dic") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading dictionary {}", path.display()))?;
            let words = parse_word_list(&content);
            info!(target: "speller", language, words = words.len(), "dictionary_loaded");
            speller.add_language(language, words);
        }
        Ok(speller)
    }

    /// Attach a personal word list: existing entries are loaded and later
    /// additions are appended to the file.
    pub fn with_personal_dictionary(mut self, path: PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading personal dictionary {}", path.display()))?;
            self.personal.extend(parse_word_list(&content));
        }
        self.personal_path = Some(path);
        Ok(self)
    }

    pub fn set_skip_run_together(&mut self, skip: bool) {
        self.skip_run_together = skip;
    }

    /// Restrict language detection to these codes (empty means every loaded language).
    pub fn set_preferred_languages(&mut self, languages: Vec<String>) {
        self.preferred = languages;
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    pub fn word_count(&self, language: &str) -> usize {
        self.dictionaries.get(language).map_or(0, Dictionary::len)
    }

    fn dictionary(&self, language: &str) -> Result<&Dictionary, SpellerError> {
        self.dictionaries
            .get(language)
            .ok_or_else(|| SpellerError::Unavailable {
                language: language.to_string(),
            })
    }

    fn accepts(&self, dict: &Dictionary, word: &str) -> bool {
        self.ignored.contains(word)
            || self.personal.contains(word)
            || dict.has_variant(word)
            || (self.skip_run_together && dict.splits_into_two(word))
    }
}

fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            // hunspell .dic files open with an entry count
            if idx == 0 && line.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let word = line.split('/').next().unwrap_or(line).trim();
            (!word.is_empty()).then(|| word.to_string())
        })
        .collect()
}

impl Speller for WordListSpeller {
    fn is_correct(&self, word: &str, language: &str) -> Result<bool, SpellerError> {
        let dict = self.dictionary(language)?;
        let ok = self.accepts(dict, word);
        trace!(target: "speller", language, ok, "is_correct");
        Ok(ok)
    }

    fn suggestions(
        &self,
        word: &str,
        language: &str,
        max: Option<usize>,
    ) -> Result<Vec<String>, SpellerError> {
        let dict = self.dictionary(language)?;
        let out = suggest::generate(word, dict.alphabet(), |w| self.accepts(dict, w), max);
        debug!(target: "speller", language, count = out.len(), "suggestions");
        Ok(out)
    }

    fn detect_language(&self, text: &str) -> Option<String> {
        let candidates = self
            .dictionaries
            .iter()
            .filter(|(lang, _)| self.preferred.is_empty() || self.preferred.contains(*lang))
            .map(|(lang, dict)| (lang.as_str(), dict));
        detect::guess(text, candidates)
    }

    fn add_to_personal_dictionary(&mut self, word: &str) -> Result<(), SpellerError> {
        if !self.personal.insert(word.to_string()) {
            return Ok(());
        }
        if let Some(path) = &self.personal_path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{word}")?;
        }
        debug!(target: "speller", personal = self.personal.len(), "personal_word_added");
        Ok(())
    }

    fn ignore_for_session(&mut self, word: &str) -> Result<(), SpellerError> {
        self.ignored.insert(word.to_string());
        Ok(())
    }

    fn is_available(&self, language: &str) -> bool {
        self.dictionaries.contains_key(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn english() -> WordListSpeller {
        WordListSpeller::new().with_language(
            "en_US",
            ["hello", "world", "the", "cat", "sat", "on", "mat", "Paris", "note", "book"],
        )
    }

    #[test]
    fn case_variants_follow_entry_shape() {
        let sp = english();
        assert!(sp.is_correct("hello", "en_US").unwrap());
        assert!(sp.is_correct("Hello", "en_US").unwrap());
        assert!(sp.is_correct("HELLO", "en_US").unwrap());
        assert!(!sp.is_correct("hELLO", "en_US").unwrap());
        assert!(sp.is_correct("PARIS", "en_US").unwrap());
        assert!(!sp.is_correct("paris", "en_US").unwrap());
    }

    #[test]
    fn missing_language_is_unavailable() {
        let sp = english();
        assert!(!sp.is_available("de_DE"));
        assert!(matches!(
            sp.is_correct("hallo", "de_DE"),
            Err(SpellerError::Unavailable { .. })
        ));
    }

    #[test]
    fn run_together_words_need_the_flag() {
        let mut sp = english();
        assert!(!sp.is_correct("notebook", "en_US").unwrap());
        sp.set_skip_run_together(true);
        assert!(sp.is_correct("notebook", "en_US").unwrap());
        assert!(!sp.is_correct("notebookx", "en_US").unwrap());
    }

    #[test]
    fn ignore_and_personal_words_are_accepted() {
        let mut sp = english();
        sp.ignore_for_session("teh").unwrap();
        sp.add_to_personal_dictionary("ropey").unwrap();
        assert!(sp.is_correct("teh", "en_US").unwrap());
        assert!(sp.is_correct("ropey", "en_US").unwrap());
    }

    #[test]
    fn personal_dictionary_persists_additions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("personal.dic");
        std::fs::write(&path, "oxspell\n").unwrap();
        let mut sp = english().with_personal_dictionary(path.clone()).unwrap();
        assert!(sp.is_correct("oxspell", "en_US").unwrap());
        sp.add_to_personal_dictionary("ropey").unwrap();
        sp.add_to_personal_dictionary("ropey").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "oxspell\nropey\n");
    }

    #[test]
    fn load_dir_reads_hunspell_style_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en_US.dic"), "3\nhello/MS\nworld\n# comment\n\ncat/S\n")
            .unwrap();
        std::fs::write(dir.path().join("de_DE.dic"), "hallo\nwelt\n").unwrap();
        std::fs::write(dir.path().join("README"), "not a dictionary").unwrap();
        let sp = WordListSpeller::load_dir(dir.path()).unwrap();
        assert_eq!(sp.languages().collect::<Vec<_>>(), vec!["de_DE", "en_US"]);
        assert_eq!(sp.word_count("en_US"), 3);
        assert!(sp.is_correct("cat", "en_US").unwrap());
        assert!(sp.is_correct("welt", "de_DE").unwrap());
    }

    #[test]
    fn suggestions_respect_limit() {
        let sp = english();
        let all = sp.suggestions("mta", "en_US", None).unwrap();
        assert_eq!(all.first().map(String::as_str), Some("mat"));
        let one = sp.suggestions("cta", "en_US", Some(1)).unwrap();
        assert_eq!(one, vec!["cat".to_string()]);
    }
}
