//! Common utilities for phrase-funnel benchmarks.
//!
//! Deterministic phrase lists and input texts so runs are comparable.

#![allow(dead_code)]

/// Standard benchmark sizes.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of phrases registered in the filter
    pub phrase_count: usize,
    /// Words per generated input text
    pub text_words: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            phrase_count: 1_000,
            text_words: 200,
        }
    }
}

const VOCABULARY: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "xray", "yankee", "zulu", "can't", "won't", "hello", "world",
];

/// Small linear congruential generator; only used to spread words around.
fn next(seed: &mut u64) -> usize {
    *seed = seed
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    (*seed >> 33) as usize
}

/// `count` phrases of two to four vocabulary words.
pub fn create_phrases(count: usize) -> Vec<String> {
    let mut seed = 42;
    (0..count)
        .map(|_| {
            let len = 2 + next(&mut seed) % 3;
            (0..len)
                .map(|_| VOCABULARY[next(&mut seed) % VOCABULARY.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Text of `words` vocabulary words with mixed punctuation and casing.
pub fn create_text(words: usize, seed: u64) -> String {
    let mut seed = seed;
    let separators = [" ", ", ", ". ", "! ", " - ", "\n"];
    let mut text = String::new();
    for i in 0..words {
        let word = VOCABULARY[next(&mut seed) % VOCABULARY.len()];
        if i % 7 == 0 {
            text.push_str(&word.to_uppercase());
        } else {
            text.push_str(word);
        }
        text.push_str(separators[next(&mut seed) % separators.len()]);
    }
    text
}

/// Break `text` into chunks of roughly `size` bytes on char boundaries.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end += 1;
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// `count` distinct token names.
pub fn create_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Token{i}")).collect()
}
