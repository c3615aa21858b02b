//! Configuration Loader
//!
//! Layers built-in defaults, an optional configuration file and prefixed
//! environment variables with the `config` crate, then validates the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::GeneratorConfig;
use crate::constants;

/// Builds a [`GeneratorConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    /// Replaces the process environment; used by tests
    env_source: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that reads `config/batch-generator.toml` when present.
    pub fn new() -> Self {
        Self {
            file: Some(PathBuf::from(constants::DEFAULT_CONFIG_FILE)),
            file_required: false,
            env_source: None,
        }
    }

    /// Read configuration from `path`; loading fails if it does not exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_required = true;
        self
    }

    /// Skip file loading entirely.
    pub fn without_file(mut self) -> Self {
        self.file = None;
        self.file_required = false;
        self
    }

    /// Use `vars` instead of the process environment for overrides.
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    pub fn load(&self) -> ConfigResult<GeneratorConfig> {
        let defaults = config::Config::try_from(&GeneratorConfig::default())
            .map_err(|e| ConfigurationError::parse_error("built-in defaults", e))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = &self.file {
            if self.file_required && !path.is_file() {
                return Err(ConfigurationError::file_read_error(
                    path.display().to_string(),
                    "file does not exist",
                ));
            }
            debug!(
                file = %path.display(),
                required = self.file_required,
                "Adding configuration file source"
            );
            builder = builder
                .add_source(config::File::from(path.as_path()).required(self.file_required));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(constants::ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(self.env_source.clone()),
        );

        let config: GeneratorConfig = builder
            .build()
            .map_err(|e| self.source_error(e))?
            .try_deserialize()
            .map_err(|e| self.source_error(e))?;

        config.validate()?;

        debug!(
            containers = config.layout.containers,
            records_per_container = config.layout.records_per_container,
            base_dir = %config.layout.base_dir.display(),
            git_enabled = config.git.enabled,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn source_error(&self, error: config::ConfigError) -> ConfigurationError {
        let name = self
            .file
            .as_deref()
            .map(Path::display)
            .map(|p| format!("configuration '{p}'"))
            .unwrap_or_else(|| "configuration".to_string());
        ConfigurationError::parse_error(name, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FailurePolicy, TimestampPrecision};
    use std::io::Write;

    fn isolated() -> ConfigLoader {
        ConfigLoader::new()
            .without_file()
            .with_env_source(HashMap::new())
    }

    #[test]
    fn loads_defaults_without_sources() {
        let config = isolated().load().expect("defaults load");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[layout]
containers = 2
records_per_container = 3

[record]
timestamp_precision = "nanos"

[failure]
on_write_error = "abort"
"#
        )
        .unwrap();

        let config = isolated().with_file(file.path()).load().expect("file loads");
        assert_eq!(config.layout.containers, 2);
        assert_eq!(config.layout.records_per_container, 3);
        assert_eq!(config.layout.token_length, 8);
        assert_eq!(config.record.timestamp_precision, TimestampPrecision::Nanos);
        assert_eq!(config.failure.on_write_error, FailurePolicy::Abort);
        assert_eq!(config.failure.on_commit_error, FailurePolicy::Skip);
    }

    #[test]
    fn environment_overrides_file() {
        let vars = HashMap::from([
            ("BATCHGEN__LAYOUT__CONTAINERS".to_string(), "7".to_string()),
            ("BATCHGEN__GIT__ENABLED".to_string(), "false".to_string()),
        ]);
        let config = isolated().with_env_source(vars).load().expect("env loads");
        assert_eq!(config.layout.containers, 7);
        assert!(!config.git.enabled);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let err = isolated()
            .with_file("/definitely/not/here.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::FileReadError { .. }));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let vars = HashMap::from([(
            "BATCHGEN__EXECUTION__PARALLELISM".to_string(),
            "0".to_string(),
        )]);
        let err = isolated().with_env_source(vars).load().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}
