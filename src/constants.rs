//! # Generation Constants
//!
//! Defaults that seed [`GeneratorConfig`](crate::config::GeneratorConfig) and the
//! fixed textual formats shared by the naming, storage and commit modules.

/// Author string written into every record.
pub const DEFAULT_AUTHOR: &str = "MD. Naiem Islam Nahid";

/// Directory that receives the generated containers.
pub const DEFAULT_BASE_DIR: &str = "generated_folders";

pub const DEFAULT_CONTAINER_COUNT: usize = 1000;
pub const DEFAULT_RECORDS_PER_CONTAINER: usize = 100;

/// Length of the random token appended to each container index.
pub const DEFAULT_TOKEN_LENGTH: usize = 8;

/// Zero-padding width of the container index.
pub const DEFAULT_INDEX_WIDTH: usize = 4;

pub const DEFAULT_COMMIT_CHANNEL_CAPACITY: usize = 256;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "BATCHGEN";

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/batch-generator.toml";

/// Extension of every record file.
pub const RECORD_EXTENSION: &str = "txt";

/// Record field keys, in the order they are written.
pub mod fields {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const DATE: &str = "Date";
    pub const CREATED_BY: &str = "Created by";
    pub const FOLDER: &str = "Folder";
    pub const FILE: &str = "File";
    pub const UUID: &str = "UUID";

    pub const ORDER: [&str; 6] = [TIMESTAMP, DATE, CREATED_BY, FOLDER, FILE, UUID];
}

/// Commit message formats.
pub mod messages {
    pub fn folder_created(container: &str) -> String {
        format!("Created folder: {container}")
    }

    pub fn file_created(container: &str, file_name: &str) -> String {
        format!("Created file in {container}: {file_name}")
    }

    pub fn batch(messages: &[String]) -> String {
        let mut out = format!("Batch commit: {} operations\n", messages.len());
        for message in messages {
            out.push_str("\n- ");
            out.push_str(message);
        }
        out
    }
}

/// Output markers git prints when a commit has nothing staged.
pub const NOTHING_TO_COMMIT_MARKERS: [&str; 2] = ["nothing to commit", "nothing added to commit"];
