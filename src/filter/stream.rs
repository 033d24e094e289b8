//! Incremental phrase matching over text that arrives in chunks.

use super::matcher::{Frontier, WordFilter};
use super::tokenizer::WordBuffer;
use super::types::MatchType;
use crate::config::FilterConfig;
use std::sync::Arc;

/// Stateful wrapper around a [`WordFilter`] for text delivered piece by
/// piece, for example tokens coming out of a generator.
///
/// Completed words are matched as they arrive; a word cut off at the end of
/// a chunk stays buffered until a later chunk finishes it, so phrases are
/// found across chunk boundaries. The trailing partial word is still
/// checked at the end of every call (without being consumed), so the result
/// of the latest call equals [`WordFilter::is_match`] on everything fed so
/// far.
///
/// State persists until [`WordFilterStream::clear`]; call it before starting
/// a new, unrelated text. One stream serves one text at a time; create more
/// streams over the same shared filter with [`WordFilter::stream`].
///
/// # Examples
///
/// ```rust
/// use phrase_funnel::{MatchType, WordFilterStream};
///
/// let mut stream = WordFilterStream::new(&["stream processing"]);
/// assert!(!stream.process("This is a test for stre", MatchType::Contains));
/// assert!(stream.process("am processing in chunks.", MatchType::Contains));
///
/// stream.clear();
/// assert!(!stream.process("nothing here", MatchType::Contains));
/// ```
#[derive(Debug)]
pub struct WordFilterStream {
    filter: Arc<WordFilter>,
    frontier: Frontier,
    buffer: WordBuffer,
    matched: bool,
}

impl WordFilterStream {
    /// Build a stream with its own filter over `phrases`.
    pub fn new<S>(phrases: &[S]) -> Self
    where
        S: AsRef<str> + Sync,
    {
        Self::from_filter(Arc::new(WordFilter::new(phrases)))
    }

    pub fn with_config<S>(phrases: &[S], config: FilterConfig) -> Self
    where
        S: AsRef<str> + Sync,
    {
        Self::from_filter(Arc::new(WordFilter::with_config(phrases, config)))
    }

    /// A fresh stream over an existing, possibly shared, filter.
    pub fn from_filter(filter: Arc<WordFilter>) -> Self {
        let frontier = filter.frontier();
        Self {
            filter,
            frontier,
            buffer: WordBuffer::new(),
            matched: false,
        }
    }

    pub fn filter(&self) -> &Arc<WordFilter> {
        &self.filter
    }

    /// Register another phrase on the underlying (shared) filter.
    pub fn add_filter(&self, phrase: &str) {
        self.filter.add_filter(phrase);
    }

    /// Feed the next chunk of text. Returns true when a registered phrase
    /// has been found in the text fed since the last [`clear`](Self::clear).
    pub fn process(&mut self, chunk: &str, match_type: MatchType) -> bool {
        if self.matched {
            return true;
        }

        let tokenizer = &self.filter.config().tokenizer;
        for c in chunk.chars() {
            if let Some(word) = self.buffer.push(c, tokenizer) {
                if self
                    .filter
                    .process_word(&word, &mut self.frontier, match_type)
                {
                    self.matched = true;
                    return true;
                }
                if self.frontier.is_empty() {
                    return false;
                }
            }
        }

        !self.buffer.is_empty()
            && self
                .filter
                .completes_phrase(self.buffer.as_str(), &self.frontier)
    }

    /// [`process`](Self::process) with the filter's default match type.
    pub fn feed(&mut self, chunk: &str) -> bool {
        let match_type = self.filter.config().default_match_type;
        self.process(chunk, match_type)
    }

    /// Forget everything fed so far.
    pub fn clear(&mut self) {
        self.frontier.reset(self.filter.root());
        self.buffer.clear();
        self.matched = false;
    }

    /// Whether a completed word already produced a match.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The normalized partial word waiting for its delimiter.
    pub fn pending_word(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }
}
