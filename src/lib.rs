//! # Phrase Funnel
//!
//! Fast phrase detection over free text, plus a concurrent pool of
//! deduplicated named tokens.
//!
//! Phrases are normalized into words (case-folded, punctuation-insensitive,
//! apostrophes fused) and merged into a word trie, so a scan costs time
//! proportional to the text length no matter how many phrases are
//! registered. Text can be checked in one go or fed chunk by chunk, e.g. as
//! it streams out of a generator.
//!
//! ## Quick Start
//!
//! ### Single-shot matching
//!
//! ```rust
//! use phrase_funnel::{MatchType, WordFilter};
//!
//! let filter = WordFilter::new(&["hello world", "I can't"]);
//!
//! assert!(filter.is_match("Well... Hello, World!", MatchType::Contains));
//! assert!(filter.is_match("I cant believe it", MatchType::BeginsWith));
//! assert!(!filter.is_match("world hello", MatchType::Contains));
//! ```
//!
//! ### Streaming
//!
//! ```rust
//! use phrase_funnel::{MatchType, WordFilterStream};
//!
//! let mut stream = WordFilterStream::new(&["stream processing"]);
//! assert!(!stream.process("This is a test for stre", MatchType::Contains));
//! assert!(stream.process("am processing in chunks.", MatchType::Contains));
//! ```
//!
//! ### Token pool
//!
//! ```rust
//! use phrase_funnel::{NamedToken, Tag, TokenPool};
//!
//! let pool = TokenPool::new(|id, name| Tag::new(id, name));
//! let tag = pool.get_or_create_token("Important")?;
//! assert!(std::sync::Arc::ptr_eq(&tag, &pool.get_or_create_token(" important ")?));
//! # Ok::<(), phrase_funnel::FunnelError>(())
//! ```
//!
//! ## Configuration
//!
//! [`FilterConfig`] and [`PoolConfig`] carry builder methods and load from
//! YAML or JSON:
//!
//! ```rust
//! use phrase_funnel::{FilterConfig, MatchType};
//!
//! let config = FilterConfig::from_yaml_str("default_match_type: begins_with")?;
//! assert_eq!(config.default_match_type, MatchType::BeginsWith);
//! # Ok::<(), phrase_funnel::FunnelError>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (filter loads, token creation and
//! removal at `debug`, pool conflicts at `warn`, matches at `trace`).
//! Install any subscriber to see them.

pub mod config;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod token;

pub use config::{FilterConfig, PoolConfig, TokenizerConfig};
pub use error::{FunnelError, Result};
pub use filter::{
    tokenize, FilterNode, FilterStats, Frontier, MatchType, PhraseSet, WordFilter,
    WordFilterStream,
};
pub use metadata::{FieldName, FieldValue, StringField, StringFieldPool};
pub use token::{NamedToken, Tag, TokenFactory, TokenId, TokenPool};
