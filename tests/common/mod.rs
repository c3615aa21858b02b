//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use batch_generator::config::{GeneratorConfig, TimestampPrecision};
use batch_generator::storage::{FsRecordWriter, RecordWriter};
use batch_generator::vcs::{CommitError, CommitOutcome, CommitResult, Snapshot, SnapshotCommitter};
use batch_generator::{BatchGenerator, GeneratorError, RandomSource, Record};

/// Configuration writing into `base_dir` with git disabled and a fixed seed.
pub fn test_config(base_dir: &Path, containers: usize, records: usize) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.layout.base_dir = base_dir.to_path_buf();
    config.layout.containers = containers;
    config.layout.records_per_container = records;
    config.record.author = "Test Author".to_string();
    config.record.timestamp_precision = TimestampPrecision::Nanos;
    config.git.enabled = false;
    config.execution.seed = Some(7);
    config
}

pub fn generator_with(
    config: GeneratorConfig,
    writer: Arc<dyn RecordWriter>,
    committer: Arc<dyn SnapshotCommitter>,
) -> BatchGenerator {
    let rng = RandomSource::from_seed_option(config.execution.seed);
    BatchGenerator::new(config, writer, committer, rng).expect("valid test configuration")
}

/// Committer that records every snapshot and tracks overlapping calls.
#[derive(Default)]
pub struct RecordingCommitter {
    snapshots: Mutex<Vec<Snapshot>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every snapshot.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.snapshots().into_iter().map(|s| s.message).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotCommitter for RecordingCommitter {
    async fn commit(&self, snapshot: &Snapshot) -> CommitResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.snapshots.lock().unwrap().push(snapshot.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(CommitError::Rejected {
                code: Some(1),
                stderr: "simulated rejection".to_string(),
            });
        }
        Ok(CommitOutcome::Committed { commit_id: None })
    }
}

/// Filesystem writer that fails the record writes whose 1-based call number
/// is listed in `fail_on`.
pub struct FailingWriter {
    inner: FsRecordWriter,
    calls: AtomicUsize,
    fail_on: Vec<usize>,
}

impl FailingWriter {
    pub fn new(fail_on: Vec<usize>) -> Self {
        Self {
            inner: FsRecordWriter::new(),
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl RecordWriter for FailingWriter {
    async fn create_container(&self, path: &Path) -> batch_generator::Result<()> {
        self.inner.create_container(path).await
    }

    async fn write_record(
        &self,
        container: &Path,
        record: &Record,
    ) -> batch_generator::Result<PathBuf> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(GeneratorError::storage(
                container.join(&record.file_name),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }
        self.inner.write_record(container, record).await
    }
}

/// Filesystem writer that raises a cancellation flag once `after` records
/// have been written, standing in for an interrupt arriving mid-run.
pub struct CancellingWriter {
    inner: FsRecordWriter,
    written: AtomicUsize,
    after: usize,
    flag: OnceLock<Arc<AtomicBool>>,
}

impl CancellingWriter {
    pub fn new(after: usize) -> Self {
        Self {
            inner: FsRecordWriter::new(),
            written: AtomicUsize::new(0),
            after,
            flag: OnceLock::new(),
        }
    }

    pub fn arm(&self, flag: Arc<AtomicBool>) {
        let _ = self.flag.set(flag);
    }
}

#[async_trait]
impl RecordWriter for CancellingWriter {
    async fn create_container(&self, path: &Path) -> batch_generator::Result<()> {
        self.inner.create_container(path).await
    }

    async fn write_record(
        &self,
        container: &Path,
        record: &Record,
    ) -> batch_generator::Result<PathBuf> {
        let path = self.inner.write_record(container, record).await?;
        if self.written.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            if let Some(flag) = self.flag.get() {
                flag.store(true, Ordering::SeqCst);
            }
        }
        Ok(path)
    }
}

/// Sorted directory entries directly under `dir`.
pub fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}
