#![allow(clippy::doc_markdown)] // Allow technical terms like UUID, TOML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Batch Generator
//!
//! Generates folders of small metadata files and snapshots every creation
//! step into git.
//!
//! ## Overview
//!
//! A run creates `N` containers (directories named `<index>_<token>`) under a
//! base directory, each holding `M` records (files named
//! `<container>_<timestamp>.txt`). Every record carries six fields:
//! timestamp, date, author, owning container, its own file name and a
//! UUID-shaped identifier. After each container and record is written, a
//! snapshot is committed to the configured git repository.
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`naming`] - Owned random source, tokens, pseudo-UUIDs, timestamps
//! - [`models`] - Container identities and records
//! - [`storage`] - Filesystem writer
//! - [`vcs`] - Snapshot committers and the serialized commit queue
//! - [`orchestration`] - The generation loop and run report
//! - [`logging`] - Structured logging setup
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_generator::{BatchGenerator, GeneratorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = GeneratorConfig::default();
//! config.layout.containers = 2;
//! config.layout.records_per_container = 3;
//! config.git.enabled = false;
//!
//! let report = BatchGenerator::from_config(config).await?.run().await?;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod naming;
pub mod orchestration;
pub mod storage;
pub mod vcs;

pub use config::{
    ConfigLoader, ConfigurationError, FailurePolicy, GeneratorConfig, TimestampPrecision,
};
pub use error::{GeneratorError, Result};
pub use models::{ContainerId, Record};
pub use naming::{NameGenerator, RandomSource};
pub use orchestration::{BatchGenerator, GenerationReport};
pub use storage::{FsRecordWriter, RecordWriter};
pub use vcs::{CommitError, CommitOutcome, GitCommitter, NoopCommitter, Snapshot, SnapshotCommitter};
