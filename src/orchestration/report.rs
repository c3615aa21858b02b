//! Run statistics.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};
use crate::models::ContainerId;
use crate::vcs::CommitStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStatus {
    Created,
    /// Directory could not be created under the skip policy
    Skipped,
    /// Not started because the run was interrupted
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub index: usize,
    pub id: Option<ContainerId>,
    pub status: ContainerStatus,
    pub records_written: usize,
    pub records_skipped: usize,
    /// Commit failures tolerated under the skip policy
    pub commit_failures: usize,
}

impl ContainerSummary {
    pub fn new(index: usize, id: Option<ContainerId>, status: ContainerStatus) -> Self {
        Self {
            index,
            id,
            status,
            records_written: 0,
            records_skipped: 0,
            commit_failures: 0,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub base_dir: PathBuf,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
    pub containers_requested: usize,
    pub containers_created: usize,
    pub containers_skipped: usize,
    pub records_requested: usize,
    pub records_written: usize,
    pub records_skipped: usize,
    pub commit_failures: usize,
    pub commits: CommitStats,
    pub cancelled: bool,
    pub containers: Vec<ContainerSummary>,
}

impl GenerationReport {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        started_at: DateTime<Local>,
        containers_requested: usize,
        records_requested: usize,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            started_at,
            elapsed_ms: 0,
            containers_requested,
            containers_created: 0,
            containers_skipped: 0,
            records_requested,
            records_written: 0,
            records_skipped: 0,
            commit_failures: 0,
            commits: CommitStats::default(),
            cancelled: false,
            containers: Vec::new(),
        }
    }

    pub fn absorb(&mut self, summary: ContainerSummary) {
        match summary.status {
            ContainerStatus::Created => self.containers_created += 1,
            ContainerStatus::Skipped => self.containers_skipped += 1,
            ContainerStatus::Cancelled => {}
        }
        self.records_written += summary.records_written;
        self.records_skipped += summary.records_skipped;
        self.commit_failures += summary.commit_failures;
        self.containers.push(summary);
    }

    /// Everything requested was written and committed without tolerated failures.
    pub fn is_complete(&self) -> bool {
        !self.cancelled
            && self.containers_created == self.containers_requested
            && self.records_written == self.records_requested
            && self.commit_failures == 0
    }

    pub fn records_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.records_written as f64 / (self.elapsed_ms as f64 / 1000.0)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Folders: {}/{} created ({} skipped) in {}",
            self.containers_created,
            self.containers_requested,
            self.containers_skipped,
            self.base_dir.display()
        );
        let _ = writeln!(
            out,
            "Files: {}/{} written ({} skipped)",
            self.records_written, self.records_requested, self.records_skipped
        );
        let _ = writeln!(
            out,
            "Commits: {} ({} committed, {} nothing to commit, {} failed)",
            self.commits.commits,
            self.commits.committed,
            self.commits.nothing_to_commit,
            self.commits.failed
        );
        let _ = write!(
            out,
            "Duration: {:.2} seconds ({:.2} files/s)",
            self.elapsed_ms as f64 / 1000.0,
            self.records_per_second()
        );
        if self.cancelled {
            out.push_str("\nRun was interrupted before completion");
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`, creating parent directories.
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GeneratorError::storage(parent, e))?;
        }
        tokio::fs::write(path, self.to_json()?)
            .await
            .map_err(|e| GeneratorError::storage(path, e))
    }
}
