use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating the agent configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration key '{key}'")]
    Missing { key: &'static str },

    #[error("invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to load environment file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }

    /// The configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::Missing { key } | ConfigError::Invalid { key, .. } => Some(key),
            ConfigError::EnvFile { .. } => None,
        }
    }
}
