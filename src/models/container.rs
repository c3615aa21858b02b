use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a generated container: zero-padded index, `_`, random token.
///
/// Also the container's directory name under the base directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// `index` is padded to `width` digits; wider indices are kept whole.
    pub fn new(index: usize, width: usize, token: impl AsRef<str>) -> Self {
        Self(format!("{index:0width$}_{}", token.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric index this identity was built from.
    pub fn index(&self) -> usize {
        self.0
            .split_once('_')
            .and_then(|(index, _)| index.parse().ok())
            .unwrap_or_default()
    }

    /// Directory of this container under `base_dir`.
    pub fn path_in(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
