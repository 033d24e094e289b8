//! Shared types for word filtering.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Comparison strictness for a word filter.
///
/// There is no "ends with": filters only ever feed forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// A phrase may start at any word of the input. Needs to scan the whole
    /// input when nothing matches.
    #[default]
    Contains,
    /// A phrase must start at the first word of the input. Stops as soon as
    /// no registered phrase can still match.
    BeginsWith,
}

/// Shape of a word trie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Nodes below the root.
    pub node_count: usize,
    /// Distinct registered phrases.
    pub phrase_count: usize,
    /// Words in the longest registered path.
    pub max_depth: usize,
}

/// A list of phrases as stored in YAML or JSON.
///
/// ```rust
/// use phrase_funnel::filter::PhraseSet;
///
/// let set = PhraseSet::from_yaml_str("phrases:\n  - I can't\n  - I won't\n").unwrap();
/// assert_eq!(set.phrases.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_default() {
        assert_eq!(MatchType::default(), MatchType::Contains);
    }

    #[test]
    fn test_match_type_serde_names() {
        let json = serde_json::to_string(&MatchType::BeginsWith).unwrap();
        assert_eq!(json, "\"begins_with\"");
        let parsed: MatchType = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(parsed, MatchType::Contains);
    }

    #[test]
    fn test_phrase_set_from_json() {
        let set = PhraseSet::from_json_str(r#"{"phrases": ["hello world", "stop"]}"#).unwrap();
        assert_eq!(set, PhraseSet::new(["hello world", "stop"]));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_phrase_set_missing_list_is_empty() {
        let set = PhraseSet::from_yaml_str("{}").unwrap();
        assert!(set.is_empty());
        assert!(PhraseSet::from_yaml_str("phrases: 5").is_err());
    }
}
