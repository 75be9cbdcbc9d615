//! Frequency-based extractive summarization.
//!
//! 1. Split the text into sentences at `.`, `!` or `?` followed by whitespace.
//! 2. Count word frequencies over the whole text, ignoring stop words and
//!    words of two characters or fewer.
//! 3. Score each sentence by the mean frequency of its words.
//! 4. Keep the best `target` sentences, emitted in their original order.
//!
//! Equal scores are broken by position, and sentences with identical text are
//! distinct candidates.

use super::DEFAULT_TARGET_SENTENCES;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "a", "to", "of", "in", "is", "for", "on", "that", "with", "as", "by", "at", "it",
        "from", "be",
    ]
    .into_iter()
    .collect()
});

/// Words of this many characters or fewer are not counted.
const MAX_IGNORED_WORD_CHARS: usize = 2;

#[derive(Debug, Clone)]
pub struct Extractive {
    target: usize,
}

impl Default for Extractive {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SENTENCES)
    }
}

impl Extractive {
    pub fn new(target: usize) -> Self {
        Self { target }
    }

    pub fn summarize(&self, text: &str) -> String {
        let sentences = split_sentences(text);
        if sentences.len() <= self.target {
            return text.trim().to_string();
        }

        let freqs = word_frequencies(text);
        if freqs.is_empty() {
            return sentences[..self.target].join(" ");
        }

        let scores: Vec<f64> = sentences.iter().map(|s| sentence_score(s, &freqs)).collect();
        let keep: HashSet<usize> = (0..sentences.len())
            .sorted_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)))
            .take(self.target)
            .collect();

        sentences
            .iter()
            .enumerate()
            .filter(|(i, _)| keep.contains(i))
            .map(|(_, s)| *s)
            .join(" ")
            .trim()
            .to_string()
    }
}

/// Split after sentence-terminal punctuation followed by whitespace.
///
/// The punctuation stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // punctuation is one byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freqs = HashMap::new();
    for word in WORD.find_iter(text) {
        let word = word.as_str().to_lowercase();
        if word.chars().count() <= MAX_IGNORED_WORD_CHARS || STOP_WORDS.contains(word.as_str()) {
            continue;
        }
        *freqs.entry(word).or_insert(0) += 1;
    }
    freqs
}

fn sentence_score(sentence: &str, freqs: &HashMap<String, usize>) -> f64 {
    if sentence.trim().is_empty() {
        return 0.0;
    }
    let words: Vec<String> = WORD.find_iter(sentence).map(|w| w.as_str().to_lowercase()).collect();
    let total: usize = words.iter().map(|w| freqs.get(w).copied().unwrap_or(0)).sum();
    total as f64 / words.len().max(1) as f64
}
