//! Single-shot phrase matching over a shared word trie.

use super::node::FilterNode;
use super::stream::WordFilterStream;
use super::tokenizer::{tokenize, WordBuffer};
use super::types::{FilterStats, MatchType, PhraseSet};
use crate::config::FilterConfig;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

/// Trie positions of every phrase that is partially matched so far.
///
/// Order carries no meaning and a node appears at most once.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    nodes: Vec<Arc<FilterNode>>,
}

impl Frontier {
    /// A frontier positioned at `root`, before any word was read.
    pub fn new(root: &Arc<FilterNode>) -> Self {
        Self {
            nodes: vec![Arc::clone(root)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &Arc<FilterNode>) -> bool {
        self.nodes.iter().any(|n| Arc::ptr_eq(n, node))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FilterNode>> {
        self.nodes.iter()
    }

    pub(crate) fn reset(&mut self, root: &Arc<FilterNode>) {
        self.nodes.clear();
        self.nodes.push(Arc::clone(root));
    }

    fn push_unique(&mut self, node: Arc<FilterNode>) {
        if !self.contains(&node) {
            self.nodes.push(node);
        }
    }

    fn take(&mut self) -> Vec<Arc<FilterNode>> {
        std::mem::take(&mut self.nodes)
    }
}

/// Fast "does this text contain / begin with any of N phrases" test.
///
/// Phrases are split into normalized words and stored in a trie, so a scan
/// costs O(text length) regardless of how many phrases are registered.
/// Matching ignores case and punctuation; apostrophes are dropped so
/// "can't" and "cant" are the same word.
///
/// # Examples
///
/// ```rust
/// use phrase_funnel::{MatchType, WordFilter};
///
/// let filter = WordFilter::new(&["hello world", "begin here"]);
///
/// assert!(filter.is_match("Well, HELLO world!", MatchType::Contains));
/// assert!(filter.is_match("Begin here to test.", MatchType::BeginsWith));
/// assert!(!filter.is_match("hello in world", MatchType::Contains));
/// ```
///
/// # Thread Safety
///
/// A `WordFilter` can be shared (`Arc<WordFilter>`) and matched from many
/// threads. [`WordFilter::add_filter`] serializes writers on one trie-wide
/// lock; readers do not take it. A match running while a phrase is added
/// may miss that phrase, but never observes a torn node.
#[derive(Debug)]
pub struct WordFilter {
    root: Arc<FilterNode>,
    write_lock: Mutex<()>,
    config: FilterConfig,
}

impl WordFilter {
    /// Build a filter from `phrases` with the default configuration.
    pub fn new<S>(phrases: &[S]) -> Self
    where
        S: AsRef<str> + Sync,
    {
        Self::with_config(phrases, FilterConfig::default())
    }

    /// Build a filter from `phrases`. Long phrase lists are tokenized and
    /// inserted in parallel; each insert still holds the trie write lock.
    pub fn with_config<S>(phrases: &[S], config: FilterConfig) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let filter = Self {
            root: Arc::new(FilterNode::root()),
            write_lock: Mutex::new(()),
            config,
        };

        let parallel = filter.config.should_load_parallel(phrases.len());
        if parallel {
            phrases
                .par_iter()
                .for_each(|phrase| filter.add_filter(phrase.as_ref()));
        } else {
            for phrase in phrases {
                filter.add_filter(phrase.as_ref());
            }
        }

        debug!(
            phrases = phrases.len(),
            parallel,
            nodes = filter.stats().node_count,
            "word filter loaded"
        );
        filter
    }

    pub fn from_phrase_set(set: &PhraseSet, config: FilterConfig) -> Self {
        Self::with_config(&set.phrases, config)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn root(&self) -> &Arc<FilterNode> {
        &self.root
    }

    /// A frontier at the root, ready for [`WordFilter::process_word`].
    pub fn frontier(&self) -> Frontier {
        Frontier::new(&self.root)
    }

    /// Register another phrase. Adding the same phrase twice changes nothing.
    ///
    /// Safe to call while other threads are matching; a match already in
    /// progress will not necessarily see the new phrase.
    pub fn add_filter(&self, phrase: &str) {
        let words = tokenize(phrase, &self.config.tokenizer);
        if words.is_empty() {
            debug!(phrase, "ignoring phrase without words");
            return;
        }

        let _guard = self.write_lock.lock();
        let last = words
            .iter()
            .fold(Arc::clone(&self.root), |node, word| node.child_or_insert(word));
        last.mark_final();
    }

    /// Check `input` for any registered phrase.
    ///
    /// Empty or whitespace-only input never matches. With
    /// [`MatchType::BeginsWith`] the scan stops as soon as no phrase can
    /// still match.
    pub fn is_match(&self, input: &str, match_type: MatchType) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        let mut frontier = self.frontier();
        let mut buffer = WordBuffer::new();

        for c in input.chars() {
            if let Some(word) = buffer.push(c, &self.config.tokenizer) {
                if self.process_word(&word, &mut frontier, match_type) {
                    return true;
                }
                if frontier.is_empty() {
                    return false;
                }
            }
        }

        match buffer.take() {
            Some(word) => self.process_word(&word, &mut frontier, match_type),
            None => false,
        }
    }

    /// [`WordFilter::is_match`] with the configured default match type.
    pub fn matches(&self, input: &str) -> bool {
        self.is_match(input, self.config.default_match_type)
    }

    /// Advance `frontier` by one normalized word.
    ///
    /// Every node in the frontier is replaced by its child for `word`, if
    /// any. Returns true as soon as that child ends a phrase. In
    /// [`MatchType::Contains`] mode the root (and the root's own child for
    /// `word`) is put back so a phrase can start at any later word.
    pub fn process_word(&self, word: &str, frontier: &mut Frontier, match_type: MatchType) -> bool {
        let current = frontier.take();
        let restart = match match_type {
            MatchType::Contains => self.root.child(word),
            MatchType::BeginsWith => None,
        };

        for node in current {
            if let Some(child) = node.child(word) {
                if child.is_final() {
                    trace!(word, "phrase matched");
                    return true;
                }
                frontier.push_unique(child);
            }
            if let Some(start) = &restart {
                frontier.push_unique(Arc::clone(start));
            }
        }

        if match_type == MatchType::Contains {
            frontier.push_unique(Arc::clone(&self.root));
        }
        false
    }

    /// Whether `word` would complete a phrase from `frontier`, without
    /// advancing it.
    pub fn completes_phrase(&self, word: &str, frontier: &Frontier) -> bool {
        frontier.iter().any(|node| node.completes_with(word))
    }

    /// Independent stream state over this filter's trie.
    pub fn stream(self: &Arc<Self>) -> WordFilterStream {
        WordFilterStream::from_filter(Arc::clone(self))
    }

    /// Count nodes, phrases and depth of the trie.
    pub fn stats(&self) -> FilterStats {
        let mut stats = FilterStats::default();
        let mut pending = vec![(Arc::clone(&self.root), 0usize)];

        while let Some((node, depth)) = pending.pop() {
            if depth > 0 {
                stats.node_count += 1;
            }
            if node.is_final() {
                stats.phrase_count += 1;
                stats.max_depth = stats.max_depth.max(depth);
            }
            pending.extend(node.children().into_iter().map(|child| (child, depth + 1)));
        }

        stats
    }
}
