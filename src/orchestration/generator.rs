//! # Batch Generator
//!
//! Drives the container/record double loop:
//!
//! ```text
//! for each container 1..=N
//!     create <base_dir>/<index>_<token>/      -> snapshot "Created folder: .."
//!     for each record 1..=M
//!         write <container>_<timestamp>.txt   -> snapshot "Created file in ..: .."
//! ```
//!
//! Containers run one at a time unless `execution.parallelism` allows more.
//! Snapshots always go through the single [`CommitQueue`] task. With a commit
//! batch size of one every step waits for its commit; with batching, commit
//! results are settled after the queue drains.

use chrono::Local;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::report::{ContainerStatus, ContainerSummary, GenerationReport};
use crate::config::{FailurePolicy, GeneratorConfig};
use crate::constants::messages;
use crate::error::{GeneratorError, Result};
use crate::models::Record;
use crate::naming::{NameGenerator, RandomSource};
use crate::storage::{FsRecordWriter, RecordWriter};
use crate::vcs::{
    CommitHandle, CommitQueue, CommitResult, CommitTicket, GitCommitter, NoopCommitter, Snapshot,
    SnapshotCommitter,
};

pub struct BatchGenerator {
    config: GeneratorConfig,
    writer: Arc<dyn RecordWriter>,
    committer: Arc<dyn SnapshotCommitter>,
    names: NameGenerator,
    cancelled: Arc<AtomicBool>,
}

impl BatchGenerator {
    /// Assemble a generator from explicit parts.
    pub fn new(
        config: GeneratorConfig,
        writer: Arc<dyn RecordWriter>,
        committer: Arc<dyn SnapshotCommitter>,
        rng: RandomSource,
    ) -> Result<Self> {
        config.validate()?;
        let names = NameGenerator::from_config(rng, &config);
        Ok(Self {
            config,
            writer,
            committer,
            names,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Filesystem writer plus git (or no-op when disabled), seeded from
    /// `execution.seed` when present.
    pub async fn from_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let committer: Arc<dyn SnapshotCommitter> = if config.git.enabled {
            Arc::new(GitCommitter::open(&config.git).await?)
        } else {
            Arc::new(NoopCommitter)
        };
        let rng = RandomSource::from_seed_option(config.execution.seed);
        Self::new(config, Arc::new(FsRecordWriter::new()), committer, rng)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Setting the flag stops new containers and records from starting.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Generate every container and record. Each call produces a fresh set of
    /// names; nothing from a previous run is reused or overwritten.
    pub async fn run(&mut self) -> Result<GenerationReport> {
        let started_at = Local::now();
        let clock = Instant::now();
        let layout = &self.config.layout;

        tokio::fs::create_dir_all(&layout.base_dir)
            .await
            .map_err(|e| GeneratorError::storage(&layout.base_dir, e))?;

        info!(
            containers = layout.containers,
            records_per_container = layout.records_per_container,
            base_dir = %layout.base_dir.display(),
            parallelism = self.config.execution.parallelism,
            commit_batch_size = self.config.git.commit_batch_size,
            "Starting folder generation"
        );

        let queue = CommitQueue::spawn(
            Arc::clone(&self.committer),
            self.config.git.commit_batch_size,
            self.config.execution.commit_channel_capacity,
        );

        let plans: Vec<(usize, NameGenerator)> = (1..=self.config.layout.containers)
            .map(|index| (index, self.names.fork()))
            .collect();

        let mut report = GenerationReport::new(
            &self.config.layout.base_dir,
            started_at,
            self.config.layout.containers,
            self.config.total_records(),
        );
        let mut deferred = Vec::new();
        let mut failure = None;

        {
            let worker = ContainerWorker {
                config: &self.config,
                writer: self.writer.as_ref(),
                commits: queue.handle(),
                wait_per_step: queue.batch_size() == 1,
                cancelled: &self.cancelled,
            };

            let mut containers = stream::iter(plans)
                .map(|(index, names)| worker.generate(index, names))
                .buffered(self.config.execution.parallelism);

            while let Some(result) = containers.next().await {
                match result {
                    Ok(run) => {
                        deferred.extend(run.deferred);
                        report.absorb(run.summary);
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }

        let stats = queue.shutdown().await?;

        for pending in deferred {
            let result = pending.ticket.wait().await;
            let failed = result.is_err();
            match settle(self.config.failure.on_commit_error, &pending.message, result) {
                Err(e) => {
                    failure.get_or_insert(e);
                }
                Ok(()) if failed => {
                    if let Some(summary) = report
                        .containers
                        .iter_mut()
                        .find(|s| s.index == pending.container_index)
                    {
                        summary.commit_failures += 1;
                    }
                }
                Ok(()) => {}
            }
        }
        report.commit_failures = report.containers.iter().map(|s| s.commit_failures).sum();

        report.commits = stats;
        report.cancelled = self.cancelled.load(Ordering::SeqCst);
        report.elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Some(e) = failure {
            warn!(
                containers_created = report.containers_created,
                records_written = report.records_written,
                error = %e,
                "Generation aborted"
            );
            return Err(e);
        }

        info!(
            containers_created = report.containers_created,
            records_written = report.records_written,
            records_skipped = report.records_skipped,
            commits = report.commits.commits,
            elapsed_ms = report.elapsed_ms,
            cancelled = report.cancelled,
            "Generation finished"
        );

        Ok(report)
    }
}

/// A snapshot whose commit result is settled after the queue drains.
struct DeferredCommit {
    container_index: usize,
    message: String,
    ticket: CommitTicket,
}

struct ContainerRun {
    summary: ContainerSummary,
    deferred: Vec<DeferredCommit>,
}

/// Per-run state shared by all container futures.
struct ContainerWorker<'a> {
    config: &'a GeneratorConfig,
    writer: &'a dyn RecordWriter,
    commits: CommitHandle,
    wait_per_step: bool,
    cancelled: &'a AtomicBool,
}

impl ContainerWorker<'_> {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    async fn generate(&self, index: usize, mut names: NameGenerator) -> Result<ContainerRun> {
        if self.is_cancelled() {
            return Ok(ContainerRun {
                summary: ContainerSummary::new(index, None, ContainerStatus::Cancelled),
                deferred: Vec::new(),
            });
        }

        let layout = &self.config.layout;
        let id = names.container_id(index);
        let path = id.path_in(&layout.base_dir);

        if let Err(e) = self.writer.create_container(&path).await {
            self.tolerate_write_error(e)?;
            return Ok(ContainerRun {
                summary: ContainerSummary::new(index, Some(id), ContainerStatus::Skipped),
                deferred: Vec::new(),
            });
        }

        let mut run = ContainerRun {
            summary: ContainerSummary::new(index, Some(id.clone()), ContainerStatus::Created),
            deferred: Vec::new(),
        };

        self.snapshot(messages::folder_created(id.as_str()), path.clone(), &mut run)
            .await?;

        for _ in 0..layout.records_per_container {
            if self.is_cancelled() {
                debug!(container = %id, "Cancellation requested, stopping container early");
                break;
            }

            let record = Record::new(
                &id,
                names.timestamp(),
                &self.config.record.author,
                names.pseudo_uuid(),
            );

            match self.writer.write_record(&path, &record).await {
                Ok(file) => {
                    debug!(container = %id, record = %record.file_name, "Record written");
                    run.summary.records_written += 1;
                    let message = messages::file_created(id.as_str(), &record.file_name);
                    self.snapshot(message, file, &mut run).await?;
                }
                Err(e) => {
                    self.tolerate_write_error(e)?;
                    run.summary.records_skipped += 1;
                }
            }
        }

        info!("Completed folder {}/{}: {}", index, layout.containers, id);

        Ok(run)
    }

    /// Returns the error under the abort policy, logs it under skip.
    fn tolerate_write_error(&self, error: GeneratorError) -> Result<()> {
        match self.config.failure.on_write_error {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::Skip => {
                warn!(error = %error, "Write failed, skipping");
                Ok(())
            }
        }
    }

    async fn snapshot(&self, message: String, path: PathBuf, run: &mut ContainerRun) -> Result<()> {
        let ticket = self
            .commits
            .submit(Snapshot::new(message.clone(), vec![path]))
            .await;

        if !self.wait_per_step {
            run.deferred.push(DeferredCommit {
                container_index: run.summary.index,
                message,
                ticket,
            });
            return Ok(());
        }

        let result = ticket.wait().await;
        if result.is_err() && self.config.failure.on_commit_error == FailurePolicy::Skip {
            run.summary.commit_failures += 1;
        }
        settle(self.config.failure.on_commit_error, &message, result)
    }
}

/// Apply the commit failure policy to one snapshot result.
fn settle(policy: FailurePolicy, message: &str, result: CommitResult) -> Result<()> {
    match result {
        Ok(outcome) => {
            debug!(?outcome, snapshot = message, "Snapshot settled");
            Ok(())
        }
        Err(e) => match policy {
            FailurePolicy::Abort => Err(e.into()),
            FailurePolicy::Skip => {
                warn!(error = %e, snapshot = message, "Commit failed, continuing");
                Ok(())
            }
        },
    }
}
