//! # Commit Queue
//!
//! A single task owns the [`SnapshotCommitter`]; everything else submits
//! snapshots over a bounded channel. Concurrent container generation therefore
//! never runs two git invocations against the same work tree at once.
//!
//! With a batch size above one, consecutive snapshots are folded into one
//! commit whose message lists each operation. Whatever is left is flushed when
//! the queue shuts down.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CommitError, CommitOutcome, CommitResult, Snapshot, SnapshotCommitter};
use crate::constants::messages;
use crate::error::{GeneratorError, Result};

#[derive(Debug)]
struct CommitRequest {
    snapshot: Snapshot,
    reply: oneshot::Sender<CommitResult>,
}

/// Pending result of a submitted snapshot.
#[derive(Debug)]
pub struct CommitTicket(oneshot::Receiver<CommitResult>);

impl CommitTicket {
    /// Wait for the commit that includes this snapshot.
    pub async fn wait(self) -> CommitResult {
        self.0.await.unwrap_or(Err(CommitError::QueueClosed))
    }
}

/// Cloneable submission side of a [`CommitQueue`].
#[derive(Debug, Clone)]
pub struct CommitHandle {
    sender: mpsc::Sender<CommitRequest>,
}

impl CommitHandle {
    /// Enqueue `snapshot`. Waits only for channel capacity, not for the commit.
    pub async fn submit(&self, snapshot: Snapshot) -> CommitTicket {
        let (reply, receiver) = oneshot::channel();
        if self
            .sender
            .send(CommitRequest { snapshot, reply })
            .await
            .is_err()
        {
            warn!("COMMIT_QUEUE: submission after shutdown");
        }
        CommitTicket(receiver)
    }
}

/// Counters kept by the queue task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitStats {
    /// Snapshots received
    pub snapshots: usize,
    /// Committer invocations
    pub commits: usize,
    pub committed: usize,
    pub nothing_to_commit: usize,
    pub failed: usize,
}

impl CommitStats {
    fn record(&mut self, result: &CommitResult) {
        self.commits += 1;
        match result {
            Ok(CommitOutcome::Committed { .. }) => self.committed += 1,
            Ok(CommitOutcome::NothingToCommit) => self.nothing_to_commit += 1,
            Err(_) => self.failed += 1,
        }
    }
}

pub struct CommitQueue {
    handle: CommitHandle,
    worker: JoinHandle<CommitStats>,
    batch_size: usize,
}

impl CommitQueue {
    /// Start the queue task. `batch_size` and `capacity` are clamped to at
    /// least one.
    pub fn spawn(
        committer: Arc<dyn SnapshotCommitter>,
        batch_size: usize,
        capacity: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(process_commits(committer, batch_size, receiver));

        debug!(batch_size, capacity, "COMMIT_QUEUE: started");

        Self {
            handle: CommitHandle { sender },
            worker,
            batch_size,
        }
    }

    pub fn handle(&self) -> CommitHandle {
        self.handle.clone()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Flush outstanding snapshots and stop. Every [`CommitHandle`] clone must
    /// have been dropped for this to return.
    pub async fn shutdown(self) -> Result<CommitStats> {
        drop(self.handle);
        let stats = self
            .worker
            .await
            .map_err(|e| GeneratorError::CommitQueue(e.to_string()))?;
        debug!(?stats, "COMMIT_QUEUE: stopped");
        Ok(stats)
    }
}

async fn process_commits(
    committer: Arc<dyn SnapshotCommitter>,
    batch_size: usize,
    mut receiver: mpsc::Receiver<CommitRequest>,
) -> CommitStats {
    let mut stats = CommitStats::default();
    let mut pending = Vec::with_capacity(batch_size);

    while let Some(request) = receiver.recv().await {
        stats.snapshots += 1;
        pending.push(request);
        if pending.len() >= batch_size {
            flush(committer.as_ref(), &mut pending, &mut stats).await;
        }
    }

    flush(committer.as_ref(), &mut pending, &mut stats).await;
    stats
}

async fn flush(
    committer: &dyn SnapshotCommitter,
    pending: &mut Vec<CommitRequest>,
    stats: &mut CommitStats,
) {
    let snapshot = match pending.as_slice() {
        [] => return,
        [single] => single.snapshot.clone(),
        many => combine(many),
    };

    let result = committer.commit(&snapshot).await;
    stats.record(&result);

    for request in pending.drain(..) {
        // Submitter may have stopped waiting
        let _ = request.reply.send(result.clone());
    }
}

fn combine(requests: &[CommitRequest]) -> Snapshot {
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in requests.iter().flat_map(|r| &r.snapshot.paths) {
        if !paths.contains(path) {
            paths.push(path.clone());
        }
    }
    let lines: Vec<String> = requests.iter().map(|r| r.snapshot.message.clone()).collect();
    Snapshot::new(messages::batch(&lines), paths)
}
