// Language guessing by dictionary coverage: the language whose word list
// recognises the largest share of the sentence's words wins, provided enough
// words were seen and the share clears a floor.

use crate::wordlist::Dictionary;
use core_text::segment::word_spans;

/// Fewer words than this never produce a guess.
pub const MIN_DETECT_WORDS: usize = 3;
/// Share of recognised words a language needs before it is reported.
pub const MIN_DETECT_RATIO: f64 = 0.5;

pub(crate) fn guess<'a, I>(text: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a Dictionary)>,
{
    let words: Vec<String> = word_spans(text)
        .into_iter()
        .map(|span| span.text)
        .filter(|w| w.chars().any(char::is_alphabetic) && !w.chars().any(|c| c.is_ascii_digit()))
        .collect();
    if words.len() < MIN_DETECT_WORDS {
        return None;
    }
    let mut best: Option<(&str, f64)> = None;
    for (language, dict) in candidates {
        let hits = words.iter().filter(|w| dict.has_variant(w)).count();
        let ratio = hits as f64 / words.len() as f64;
        // strict comparison keeps the first (lowest sorting) language on ties
        if best.is_none_or(|(_, r)| ratio > r) {
            best = Some((language, ratio));
        }
    }
    best.filter(|(_, ratio)| *ratio >= MIN_DETECT_RATIO)
        .map(|(language, _)| language.to_string())
}
