//! Error types for the batch generator.
//!
//! Configuration problems, storage failures and version-control failures each
//! get their own variant so the orchestrator can apply the configured failure
//! policy to the ones that are recoverable.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigurationError;
use crate::vcs::CommitError;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Storage error at '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Commit queue error: {0}")]
    CommitQueue(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl GeneratorError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from writing containers or records, as opposed to
    /// committing them.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(error: serde_json::Error) -> Self {
        GeneratorError::Report(format!("JSON serialization error: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
