//! Word-trie phrase filtering.
//!
//! Registered phrases are split into normalized words and merged into one
//! prefix trie. Matching walks the trie word by word while keeping a
//! [`Frontier`] of every phrase that is partially matched so far, so the
//! cost depends on the length of the text, not on the number of phrases.
//!
//! ## Core Components
//!
//! - [`WordFilter`] - the shared trie plus single-shot matching
//! - [`WordFilterStream`] - chunk-by-chunk matching with persistent state
//! - [`tokenize`] - the word splitting rule used on both sides
//!
//! ## Example Usage
//!
//! ```rust
//! use phrase_funnel::filter::{MatchType, WordFilter};
//! use std::sync::Arc;
//!
//! let filter = Arc::new(WordFilter::new(&["I can't", "I can not", "I won't"]));
//! assert!(filter.is_match("I cant do this", MatchType::BeginsWith));
//!
//! let mut stream = filter.stream();
//! assert!(!stream.process("i ", MatchType::BeginsWith));
//! assert!(!stream.process("can ", MatchType::BeginsWith));
//! assert!(stream.process("not ", MatchType::BeginsWith));
//! ```

pub mod matcher;
pub mod node;
pub mod stream;
pub mod tokenizer;
pub mod types;

pub use matcher::{Frontier, WordFilter};
pub use node::FilterNode;
pub use stream::WordFilterStream;
pub use tokenizer::{classify, is_apostrophe, is_delimiter, tokenize, CharClass, WordBuffer};
pub use types::{FilterStats, MatchType, PhraseSet};
