//! Configuration for word filters and token pools.
//!
//! Both configurations are plain structs with sensible defaults, a few named
//! presets and `with_*` builder methods. They also deserialize from YAML or
//! JSON so deployments can keep them next to their phrase lists.

use crate::error::Result;
use crate::filter::MatchType;
use serde::{Deserialize, Serialize};

/// Phrase lists at least this long are loaded in parallel by default.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Default number of striped locks per token pool index.
pub const DEFAULT_LOCK_STRIPES: usize = 64;

/// Controls how text is split into words.
///
/// # Examples
///
/// ```rust
/// use phrase_funnel::TokenizerConfig;
///
/// // Treat "mp3" as a word instead of "MP".
/// let config = TokenizerConfig::default().with_keep_digits(true);
/// assert!(config.keep_digits);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Count decimal digits as word characters. When off, digits are
    /// dropped without breaking the surrounding word.
    pub keep_digits: bool,
}

impl TokenizerConfig {
    pub fn with_keep_digits(mut self, enable: bool) -> Self {
        self.keep_digits = enable;
        self
    }
}

/// Word filter configuration.
///
/// # Example
/// ```rust
/// use phrase_funnel::{FilterConfig, MatchType};
///
/// let config = FilterConfig::new()
///     .with_parallel_threshold(1_000)
///     .with_default_match_type(MatchType::BeginsWith);
/// assert_eq!(config.default_match_type, MatchType::BeginsWith);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum phrase count for loading the initial phrases with rayon.
    pub parallel_threshold: usize,
    /// Match type used by `WordFilter::matches` and `WordFilterStream::feed`.
    pub default_match_type: MatchType,
    /// Word splitting options, shared by phrases and input text.
    pub tokenizer: TokenizerConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            default_match_type: MatchType::Contains,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl FilterConfig {
    /// Create a new filter configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Never load phrases in parallel. Useful inside an existing thread pool.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Default::default()
        }
    }

    /// Always load phrases in parallel, even tiny lists.
    pub fn bulk_load() -> Self {
        Self {
            parallel_threshold: 1,
            ..Default::default()
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn with_default_match_type(mut self, match_type: MatchType) -> Self {
        self.default_match_type = match_type;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Whether a list of `phrase_count` phrases should be loaded in parallel.
    pub fn should_load_parallel(&self, phrase_count: usize) -> bool {
        phrase_count >= self.parallel_threshold.max(1)
    }

    /// Parse a configuration from YAML. Missing keys fall back to defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a configuration from JSON. Missing keys fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Token pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Striped locks per index (one set for names, one for ids). Rounded up
    /// to a power of two.
    pub lock_stripes: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            lock_stripes: DEFAULT_LOCK_STRIPES,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.lock_stripes = stripes;
        self
    }

    /// The stripe count actually used: at least one, a power of two.
    pub fn effective_stripes(&self) -> usize {
        self.lock_stripes.max(1).next_power_of_two()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunnelError;

    #[test]
    fn test_filter_config_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.default_match_type, MatchType::Contains);
        assert!(!config.tokenizer.keep_digits);
    }

    #[test]
    fn test_presets() {
        assert!(!FilterConfig::sequential().should_load_parallel(1_000_000));
        assert!(FilterConfig::bulk_load().should_load_parallel(1));
        assert!(!FilterConfig::default().should_load_parallel(3));
        assert!(FilterConfig::default().should_load_parallel(DEFAULT_PARALLEL_THRESHOLD));
    }

    #[test]
    fn test_builder_methods() {
        let config = FilterConfig::new()
            .with_parallel_threshold(0)
            .with_default_match_type(MatchType::BeginsWith)
            .with_tokenizer(TokenizerConfig::default().with_keep_digits(true));

        assert_eq!(config.parallel_threshold, 1);
        assert_eq!(config.default_match_type, MatchType::BeginsWith);
        assert!(config.tokenizer.keep_digits);
    }

    #[test]
    fn test_filter_config_from_yaml() {
        let yaml = r#"
parallel_threshold: 10
default_match_type: begins_with
tokenizer:
    keep_digits: true
"#;
        let config = FilterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.parallel_threshold, 10);
        assert_eq!(config.default_match_type, MatchType::BeginsWith);
        assert!(config.tokenizer.keep_digits);
    }

    #[test]
    fn test_filter_config_partial_json_uses_defaults() {
        let config = FilterConfig::from_json_str(r#"{"parallel_threshold": 5}"#).unwrap();
        assert_eq!(config.parallel_threshold, 5);
        assert_eq!(config.default_match_type, MatchType::Contains);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let err = FilterConfig::from_yaml_str("parallel_threshold: [1, 2").unwrap_err();
        assert!(matches!(err, FunnelError::Config(_)));

        let err = FilterConfig::from_yaml_str("default_match_type: ends_with").unwrap_err();
        assert!(matches!(err, FunnelError::Config(_)));
    }

    #[test]
    fn test_pool_config_stripes() {
        assert_eq!(PoolConfig::default().effective_stripes(), 64);
        assert_eq!(PoolConfig::new().with_lock_stripes(0).effective_stripes(), 1);
        assert_eq!(PoolConfig::new().with_lock_stripes(33).effective_stripes(), 64);

        let config = PoolConfig::from_yaml_str("lock_stripes: 8").unwrap();
        assert_eq!(config.effective_stripes(), 8);
    }
}
