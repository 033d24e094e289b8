//! Error types for the phrase-funnel crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FunnelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunnelError {
    /// Structurally invalid caller input, detected before any state change.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// An insert collides with pool contents stored under a different identity.
    #[error("State conflict: {0}")]
    StateConflict(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for FunnelError {
    fn from(err: serde_yaml::Error) -> Self {
        FunnelError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FunnelError {
    fn from(err: serde_json::Error) -> Self {
        FunnelError::Config(err.to_string())
    }
}
