//! # Generator Configuration
//!
//! Every constant the generation loop depends on (counts, base directory,
//! author, timestamp precision, git behaviour, failure policy) lives in
//! [`GeneratorConfig`]. Values are layered by [`ConfigLoader`]: built-in
//! defaults, then an optional TOML file, then `BATCHGEN__*` environment
//! variables. The CLI applies its flags last.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use batch_generator::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! println!("{} containers into {}", config.layout.containers, config.layout.base_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Fractional-second precision of record timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPrecision {
    /// 3 fraction digits
    Millis,
    /// 6 fraction digits
    #[default]
    Micros,
    /// 9 fraction digits
    Nanos,
}

impl TimestampPrecision {
    pub fn digits(self) -> usize {
        match self {
            Self::Millis => 3,
            Self::Micros => 6,
            Self::Nanos => 9,
        }
    }
}

impl std::str::FromStr for TimestampPrecision {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "millis" | "ms" | "3" => Ok(Self::Millis),
            "micros" | "us" | "6" => Ok(Self::Micros),
            "nanos" | "ns" | "9" => Ok(Self::Nanos),
            other => Err(ConfigurationError::invalid_value(
                "record.timestamp_precision",
                other,
                "expected one of millis, micros, nanos",
            )),
        }
    }
}

/// What to do when a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log, count and continue with the next step
    #[default]
    Skip,
    /// Stop the run and return the error
    Abort,
}

/// Where and how many containers and records are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_dir: PathBuf,
    pub containers: usize,
    pub records_per_container: usize,
    pub token_length: usize,
    pub index_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(constants::DEFAULT_BASE_DIR),
            containers: constants::DEFAULT_CONTAINER_COUNT,
            records_per_container: constants::DEFAULT_RECORDS_PER_CONTAINER,
            token_length: constants::DEFAULT_TOKEN_LENGTH,
            index_width: constants::DEFAULT_INDEX_WIDTH,
        }
    }
}

/// Record content settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub author: String,
    pub timestamp_precision: TimestampPrecision,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            author: constants::DEFAULT_AUTHOR.to_string(),
            timestamp_precision: TimestampPrecision::default(),
        }
    }
}

/// Version-control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub enabled: bool,
    /// Working directory for every git invocation
    pub repository: PathBuf,
    /// Run `git init` when `repository` is not inside a work tree
    pub init_if_missing: bool,
    /// Snapshot requests folded into one commit; 1 commits every step
    pub commit_batch_size: usize,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repository: PathBuf::from("."),
            init_if_missing: false,
            commit_batch_size: 1,
            user_name: None,
            user_email: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureConfig {
    pub on_write_error: FailurePolicy,
    pub on_commit_error: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Containers generated concurrently; commits are always serialized
    pub parallelism: usize,
    /// Seed for the random source; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub commit_channel_capacity: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            seed: None,
            commit_channel_capacity: constants::DEFAULT_COMMIT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit console logs as JSON
    pub json: bool,
    /// Directory for a JSON log file; no file output when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where to write the JSON run report
    pub path: Option<PathBuf>,
}

/// Root configuration for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub layout: LayoutConfig,
    pub record: RecordConfig,
    pub git: GitConfig,
    pub failure: FailureConfig,
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
    pub report: ReportConfig,
}

impl GeneratorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("layout.containers", self.layout.containers),
            ("layout.records_per_container", self.layout.records_per_container),
            ("layout.token_length", self.layout.token_length),
            ("layout.index_width", self.layout.index_width),
            ("git.commit_batch_size", self.git.commit_batch_size),
            ("execution.parallelism", self.execution.parallelism),
            (
                "execution.commit_channel_capacity",
                self.execution.commit_channel_capacity,
            ),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "0",
                    "must be greater than 0",
                ));
            }
        }

        if self.layout.base_dir.as_os_str().is_empty() {
            return Err(ConfigurationError::validation_error(
                "layout.base_dir must not be empty",
            ));
        }

        if self.record.author.trim().is_empty() {
            return Err(ConfigurationError::validation_error(
                "record.author must not be empty",
            ));
        }

        if self.git.user_name.is_some() != self.git.user_email.is_some() {
            return Err(ConfigurationError::validation_error(
                "git.user_name and git.user_email must be set together",
            ));
        }

        Ok(())
    }

    /// Total records the run will attempt to write.
    pub fn total_records(&self) -> usize {
        self.layout.containers * self.layout.records_per_container
    }
}
