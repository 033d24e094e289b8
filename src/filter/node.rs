//! Trie nodes of normalized phrase words.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One word in the phrase trie.
///
/// A node owns its children; there are no back-pointers. Nodes are only ever
/// added, never removed, and the only field that changes after creation is
/// the final marker (false to true). Children sit behind a lock so a reader
/// walking the trie while a writer grows it sees either the old or the new
/// child map, never a torn one.
pub struct FilterNode {
    word: Box<str>,
    is_final: AtomicBool,
    children: RwLock<HashMap<Box<str>, Arc<FilterNode>>>,
}

impl FilterNode {
    /// The root carries an empty word.
    pub(crate) fn root() -> Self {
        Self::new("")
    }

    fn new(word: &str) -> Self {
        Self {
            word: word.into(),
            is_final: AtomicBool::new(false),
            children: RwLock::new(HashMap::new()),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Whether a registered phrase ends at this node.
    pub fn is_final(&self) -> bool {
        self.is_final.load(Ordering::Acquire)
    }

    /// Mark this node as the end of a phrase. Returns true if it was not
    /// final before.
    pub(crate) fn mark_final(&self) -> bool {
        !self.is_final.swap(true, Ordering::AcqRel)
    }

    pub fn child(&self, word: &str) -> Option<Arc<FilterNode>> {
        self.children.read().get(word).cloned()
    }

    /// Whether `word` leads to a node that ends a phrase.
    pub fn completes_with(&self, word: &str) -> bool {
        self.children
            .read()
            .get(word)
            .map_or(false, |child| child.is_final())
    }

    /// Get the child for `word`, creating it if missing.
    pub(crate) fn child_or_insert(&self, word: &str) -> Arc<FilterNode> {
        if let Some(child) = self.child(word) {
            return child;
        }
        self.children
            .write()
            .entry(word.into())
            .or_insert_with(|| Arc::new(FilterNode::new(word)))
            .clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    pub(crate) fn children(&self) -> Vec<Arc<FilterNode>> {
        self.children.read().values().cloned().collect()
    }
}

impl fmt::Debug for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterNode")
            .field("word", &self.word)
            .field("is_final", &self.is_final())
            .field("children", &self.child_count())
            .finish()
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} children", self.word, self.child_count())
    }
}
