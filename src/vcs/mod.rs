//! # Version Control
//!
//! Snapshot commits of generated containers and records.
//!
//! - [`SnapshotCommitter`] stages paths and commits them with a message
//! - [`GitCommitter`] implements it by running `git`
//! - [`NoopCommitter`] is used when version control is disabled
//! - [`CommitQueue`] funnels all commits through a single task

pub mod git;
pub mod queue;

pub use git::{GitCommitter, GitIdentity};
pub use queue::{CommitHandle, CommitQueue, CommitStats, CommitTicket};

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result of a snapshot that git accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// A commit was created; `commit_id` is the new `HEAD` when it could be read
    Committed { commit_id: Option<String> },
    /// Git reported nothing staged
    NothingToCommit,
}

/// A snapshot that could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("Failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("Staging failed (exit code {code:?}): {stderr}")]
    Stage { code: Option<i32>, stderr: String },

    #[error("Commit rejected (exit code {code:?}): {stderr}")]
    Rejected { code: Option<i32>, stderr: String },

    #[error("Commit queue stopped before the snapshot was processed")]
    QueueClosed,
}

pub type CommitResult = Result<CommitOutcome, CommitError>;

/// A staged-and-committed snapshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub message: String,
    pub paths: Vec<PathBuf>,
}

impl Snapshot {
    pub fn new(message: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            message: message.into(),
            paths,
        }
    }
}

/// Records a snapshot of `paths` with `message`. Calls must not overlap; the
/// [`CommitQueue`] guarantees this for the orchestrator.
#[async_trait]
pub trait SnapshotCommitter: Send + Sync {
    async fn commit(&self, snapshot: &Snapshot) -> CommitResult;
}

/// Accepts every snapshot without touching version control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCommitter;

#[async_trait]
impl SnapshotCommitter for NoopCommitter {
    async fn commit(&self, _snapshot: &Snapshot) -> CommitResult {
        Ok(CommitOutcome::NothingToCommit)
    }
}
