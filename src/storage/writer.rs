//! Filesystem writer for containers and records.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{GeneratorError, Result};
use crate::models::Record;

/// Destination for generated containers and records.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Create the container directory, including missing parents.
    async fn create_container(&self, path: &Path) -> Result<()>;

    /// Write `record` into `container`, returning the file path.
    async fn write_record(&self, container: &Path, record: &Record) -> Result<PathBuf>;
}

/// Writes plain-text record files. An existing file with the same name is
/// overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRecordWriter;

impl FsRecordWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordWriter for FsRecordWriter {
    async fn create_container(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| GeneratorError::storage(path, e))
    }

    async fn write_record(&self, container: &Path, record: &Record) -> Result<PathBuf> {
        fs::create_dir_all(container)
            .await
            .map_err(|e| GeneratorError::storage(container, e))?;

        let path = container.join(&record.file_name);
        fs::write(&path, record.render())
            .await
            .map_err(|e| GeneratorError::storage(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerId;

    fn record(container: &ContainerId) -> Record {
        Record::new(
            container,
            "2024-03-09_07-05-03-012",
            "tester",
            "123e4567-e89b-42d3-a456-426614174000",
        )
    }

    #[tokio::test]
    async fn writes_record_under_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let id = ContainerId::new(1, 4, "abcdefgh");
        let container = id.path_in(&dir.path().join("nested"));
        let record = record(&id);

        let path = FsRecordWriter::new()
            .write_record(&container, &record)
            .await
            .expect("write succeeds");

        assert_eq!(path, container.join(&record.file_name));
        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, record.render());
    }

    #[tokio::test]
    async fn reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").await.unwrap();

        let id = ContainerId::new(2, 4, "abcdefgh");
        let err = FsRecordWriter::new()
            .write_record(&blocker, &record(&id))
            .await
            .unwrap_err();

        match err {
            GeneratorError::Storage { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn create_container_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("0001_abc");
        let writer = FsRecordWriter::new();
        writer.create_container(&container).await.unwrap();
        writer.create_container(&container).await.unwrap();
        assert!(container.is_dir());
    }
}
