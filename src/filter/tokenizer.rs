//! Word splitting shared by phrase registration and input scanning.
//!
//! Text is read one character at a time:
//! - letters are upper-cased (one-to-one Unicode mapping, no locale) and
//!   appended to the current word
//! - apostrophes are dropped without ending the word, so "can't" and
//!   "cant" produce the same word
//! - whitespace and punctuation end the current word
//! - anything else (digits unless enabled, symbols, emoji) is dropped
//!   without ending the word
//!
//! Empty words are never produced.

use crate::config::TokenizerConfig;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// How the tokenizer treats a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Appended (upper-cased) to the current word.
    Word,
    /// Fuses the characters around it into one word.
    Apostrophe,
    /// Ends the current word.
    Delimiter,
    /// Dropped; neither appended nor a break.
    Ignored,
}

/// Unicode punctuation (general category group P), used for non-ASCII
/// characters.
static PUNCTUATION: OnceLock<Option<Regex>> = OnceLock::new();

fn punctuation_class() -> Option<&'static Regex> {
    PUNCTUATION
        .get_or_init(|| {
            Regex::new(r"\A\p{P}\z")
                .map_err(|e| warn!("Failed to build punctuation class: {}", e))
                .ok()
        })
        .as_ref()
}

/// ASCII apostrophe, right single quotation mark, modifier letter apostrophe.
pub fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{02BC}')
}

/// Punctuation in the Unicode sense: connector, dash, open/close, quote and
/// other punctuation. ASCII symbols such as `$`, `+` or `|` are not included.
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return matches!(
            c,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '?'
                | '@'
                | '['
                | '\\'
                | ']'
                | '_'
                | '{'
                | '}'
        );
    }

    let mut buf = [0u8; 4];
    punctuation_class().map_or(false, |class| class.is_match(c.encode_utf8(&mut buf)))
}

/// Whether `c` ends a word. Apostrophes never do.
pub fn is_delimiter(c: char) -> bool {
    !is_apostrophe(c) && (c.is_whitespace() || is_punctuation(c))
}

/// Classify one character under the given tokenizer settings.
pub fn classify(c: char, config: &TokenizerConfig) -> CharClass {
    if is_apostrophe(c) {
        CharClass::Apostrophe
    } else if c.is_alphabetic() || (config.keep_digits && c.is_numeric()) {
        CharClass::Word
    } else if is_delimiter(c) {
        CharClass::Delimiter
    } else {
        CharClass::Ignored
    }
}

/// Upper-case `c` one character to one character. Characters whose
/// uppercase form is longer (`ß`, `ﬁ`) stay as they are.
fn upper_invariant(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Incremental word builder.
///
/// Feed characters with [`WordBuffer::push`]; a completed word is handed back
/// when a delimiter follows a non-empty buffer. Whatever is left at the end
/// of the text is collected with [`WordBuffer::take`].
#[derive(Debug, Clone, Default)]
pub struct WordBuffer {
    buf: String,
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character, returning the word it completes, if any.
    pub fn push(&mut self, c: char, config: &TokenizerConfig) -> Option<String> {
        match classify(c, config) {
            CharClass::Word => {
                self.buf.push(upper_invariant(c));
                None
            }
            CharClass::Delimiter if !self.buf.is_empty() => Some(std::mem::take(&mut self.buf)),
            CharClass::Delimiter | CharClass::Apostrophe | CharClass::Ignored => None,
        }
    }

    /// Take the pending word out of the buffer.
    pub fn take(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }

    /// The partial word collected so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Split `text` into normalized words.
///
/// ```rust
/// use phrase_funnel::filter::tokenize;
/// use phrase_funnel::TokenizerConfig;
///
/// let words = tokenize("I can't, really!", &TokenizerConfig::default());
/// assert_eq!(words, vec!["I", "CANT", "REALLY"]);
/// ```
pub fn tokenize(text: &str, config: &TokenizerConfig) -> Vec<String> {
    let mut buffer = WordBuffer::new();
    let mut words: Vec<String> = text.chars().filter_map(|c| buffer.push(c, config)).collect();
    words.extend(buffer.take());
    words
}
