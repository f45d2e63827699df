//! Well-known filesync locations.

use std::path::{Path, PathBuf};

/// Names of the files and directories filesync keeps under the user's
/// configuration directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilesyncPath {
    /// The per-user configuration directory (`~/.config/filesync`)
    ConfigDir,
    /// The registry document (`synclist.json`)
    Registry,
    /// The optional settings file (`config.toml`)
    Settings,
}

impl FilesyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigDir => "filesync",
            Self::Registry => "synclist.json",
            Self::Settings => "config.toml",
        }
    }

    /// Resolve against a home directory: `<home>/.config/filesync[/<file>]`.
    pub fn under_home(&self, home: &Path) -> PathBuf {
        let dir = home.join(".config").join(Self::ConfigDir.as_str());
        match self {
            Self::ConfigDir => dir,
            other => dir.join(other.as_str()),
        }
    }
}

impl AsRef<Path> for FilesyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for FilesyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
