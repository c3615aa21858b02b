//! # Storage
//!
//! Persists containers and records to the filesystem.

pub mod writer;

pub use writer::{FsRecordWriter, RecordWriter};
