//! Git-backed snapshot committer.
//!
//! Every snapshot runs `git add -- <paths>` followed by
//! `git commit -m <message> --quiet` in the configured repository, and reads
//! the new `HEAD` on success. Exit statuses are captured and mapped onto
//! [`CommitOutcome`] / [`CommitError`].

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{CommitError, CommitOutcome, CommitResult, Snapshot, SnapshotCommitter};
use crate::config::GitConfig;
use crate::constants::NOTHING_TO_COMMIT_MARKERS;
use crate::error::{GeneratorError, Result};

const GIT: &str = "git";

/// Author identity passed to every git invocation with `-c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct GitCommitter {
    repository: PathBuf,
    identity: Option<GitIdentity>,
}

impl GitCommitter {
    /// Open `config.repository`, creating the directory and running `git init`
    /// when `init_if_missing` is set and it is not already a work tree.
    pub async fn open(config: &GitConfig) -> Result<Self> {
        let identity = match (&config.user_name, &config.user_email) {
            (Some(name), Some(email)) => Some(GitIdentity {
                name: name.clone(),
                email: email.clone(),
            }),
            _ => None,
        };

        if config.init_if_missing {
            tokio::fs::create_dir_all(&config.repository)
                .await
                .map_err(|e| GeneratorError::storage(&config.repository, e))?;
        }

        let repository = tokio::fs::canonicalize(&config.repository)
            .await
            .map_err(|e| {
                GeneratorError::Repository(format!(
                    "repository '{}' is not accessible: {e}",
                    config.repository.display()
                ))
            })?;

        let committer = Self {
            repository,
            identity,
        };

        if !committer.is_work_tree().await {
            if !config.init_if_missing {
                return Err(GeneratorError::Repository(format!(
                    "'{}' is not inside a git work tree",
                    committer.repository.display()
                )));
            }
            committer.init().await?;
        }

        Ok(committer)
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    async fn is_work_tree(&self) -> bool {
        match self.git(["rev-parse", "--is-inside-work-tree"]).await {
            Ok(output) => {
                output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
            }
            Err(_) => false,
        }
    }

    async fn init(&self) -> Result<()> {
        let output = self
            .git(["init", "--quiet"])
            .await
            .map_err(|e| GeneratorError::Repository(e.to_string()))?;
        if !output.status.success() {
            return Err(GeneratorError::Repository(format!(
                "git init failed in '{}': {}",
                self.repository.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!(repository = %self.repository.display(), "Initialized git repository");
        Ok(())
    }

    /// Git invocation in the repository with the configured identity.
    ///
    /// Output is forced to the C locale; [`NOTHING_TO_COMMIT_MARKERS`] are
    /// matched against untranslated messages.
    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut command = Command::new(GIT);
        if let Some(identity) = &self.identity {
            command
                .arg("-c")
                .arg(format!("user.name={}", identity.name))
                .arg("-c")
                .arg(format!("user.email={}", identity.email));
        }
        command
            .args(args.into_iter().map(Into::into))
            .current_dir(&self.repository)
            .env("LC_ALL", "C")
            .env_remove("LANGUAGE")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    async fn git<I, S>(&self, args: I) -> std::result::Result<Output, CommitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.command(args)
            .output()
            .await
            .map_err(|e| CommitError::Spawn {
                program: GIT.to_string(),
                reason: e.to_string(),
            })
    }

    /// Absolute form of `path` so staging works from any working directory.
    async fn resolve(&self, path: &Path) -> std::result::Result<OsString, CommitError> {
        tokio::fs::canonicalize(path)
            .await
            .map(PathBuf::into_os_string)
            .map_err(|e| CommitError::Stage {
                code: None,
                stderr: format!("cannot resolve '{}': {e}", path.display()),
            })
    }

    async fn head(&self) -> Option<String> {
        let output = self.git(["rev-parse", "HEAD"]).await.ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn nothing_to_commit(output: &Output) -> bool {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    NOTHING_TO_COMMIT_MARKERS
        .iter()
        .any(|marker| stdout.contains(marker) || stderr.contains(marker))
}

#[async_trait]
impl SnapshotCommitter for GitCommitter {
    async fn commit(&self, snapshot: &Snapshot) -> CommitResult {
        let mut add: Vec<OsString> = vec!["add".into(), "--".into()];
        for path in &snapshot.paths {
            add.push(self.resolve(path).await?);
        }
        if snapshot.paths.is_empty() {
            add.push(".".into());
        }

        let staged = self.git(add).await?;
        if !staged.status.success() {
            return Err(CommitError::Stage {
                code: staged.status.code(),
                stderr: String::from_utf8_lossy(&staged.stderr).trim().to_string(),
            });
        }

        let committed = self
            .git(["commit", "-m", snapshot.message.as_str(), "--quiet"])
            .await?;

        if committed.status.success() {
            let commit_id = self.head().await;
            debug!(
                commit_id = ?commit_id,
                snapshot = %snapshot.message,
                "COMMIT: recorded snapshot"
            );
            return Ok(CommitOutcome::Committed { commit_id });
        }

        if nothing_to_commit(&committed) {
            debug!(snapshot = %snapshot.message, "COMMIT: nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        let stderr = String::from_utf8_lossy(&committed.stderr).trim().to_string();
        warn!(code = ?committed.status.code(), stderr = %stderr, "COMMIT: git rejected snapshot");
        Err(CommitError::Rejected {
            code: committed.status.code(),
            stderr,
        })
    }
}
