// Suggestion generators: each applies one class of edit operation to the
// misspelled word and keeps the candidates the acceptor validates. Classes run
// cheapest-first so the output is ordered by edit plausibility.

use std::collections::HashSet;

/// Upper-case the first character, leaving the rest untouched.
pub(crate) fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct Collector<'a, F> {
    original: &'a str,
    capitalised_input: bool,
    accepts: F,
    seen: HashSet<String>,
    out: Vec<String>,
    max: Option<usize>,
}

impl<F: Fn(&str) -> bool> Collector<'_, F> {
    fn full(&self) -> bool {
        self.max.is_some_and(|m| self.out.len() >= m)
    }

    fn offer(&mut self, candidate: String) {
        if self.full() || candidate.is_empty() || candidate == self.original {
            return;
        }
        if !(self.accepts)(&candidate) {
            return;
        }
        // keep the user's leading capital on candidates built from lowercase letters
        let candidate = if self.capitalised_input
            && candidate.chars().next().is_some_and(char::is_lowercase)
        {
            capitalise(&candidate)
        } else {
            candidate
        };
        if self.seen.insert(candidate.clone()) {
            self.out.push(candidate);
        }
    }
}

fn case_change<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, word: &str) {
    let lower = word.to_lowercase();
    c.offer(capitalise(&lower));
    c.offer(lower);
}

fn swap<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, chars: &[char]) {
    for i in 0..chars.len().saturating_sub(1) {
        if chars[i] == chars[i + 1] {
            continue;
        }
        let mut buf = chars.to_vec();
        buf.swap(i, i + 1);
        c.offer(buf.into_iter().collect());
    }
}

fn deletion<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, chars: &[char]) {
    for i in 0..chars.len() {
        if i > 0 && chars[i] == chars[i - 1] {
            continue;
        }
        let candidate: String = chars[..i].iter().chain(&chars[i + 1..]).collect();
        c.offer(candidate);
    }
}

fn replacement<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, chars: &[char], alphabet: &[char]) {
    for i in 0..chars.len() {
        for &letter in alphabet {
            if letter == chars[i] {
                continue;
            }
            let mut buf = chars.to_vec();
            buf[i] = letter;
            c.offer(buf.into_iter().collect());
        }
    }
}

fn insertion<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, chars: &[char], alphabet: &[char]) {
    for i in 0..=chars.len() {
        for &letter in alphabet {
            let mut buf = chars.to_vec();
            buf.insert(i, letter);
            c.offer(buf.into_iter().collect());
        }
    }
}

fn split_word<F: Fn(&str) -> bool>(c: &mut Collector<'_, F>, chars: &[char]) {
    for at in 1..chars.len() {
        let left: String = chars[..at].iter().collect();
        let right: String = chars[at..].iter().collect();
        if (c.accepts)(&left) && (c.accepts)(&right) && !c.full() {
            let joined = format!("{left} {right}");
            if c.seen.insert(joined.clone()) {
                c.out.push(joined);
            }
        }
    }
}

/// Candidates for `word`, best first, validated through `accepts`.
pub(crate) fn generate<F>(word: &str, alphabet: &[char], accepts: F, max: Option<usize>) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    if max == Some(0) || word.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = word.chars().collect();
    let mut c = Collector {
        original: word,
        capitalised_input: chars[0].is_uppercase(),
        accepts,
        seen: HashSet::new(),
        out: Vec::new(),
        max,
    };
    case_change(&mut c, word);
    swap(&mut c, &chars);
    deletion(&mut c, &chars);
    replacement(&mut c, &chars, alphabet);
    insertion(&mut c, &chars, alphabet);
    split_word(&mut c, &chars);
    c.out
}
