//! Engine configuration
//!
//! The registry location and I/O tuning are passed into the engine as an
//! explicit [`SyncConfig`] value. Resolution order for the registry path:
//! explicit override, then `registry` from `~/.config/filesync/config.toml`,
//! then `~/.config/filesync/synclist.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use filesync_fs::{ConfigStore, FilesyncPath, RobustnessConfig};
use serde::Deserialize;

use crate::{Error, Result};

/// Resolved configuration for a [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Path of the registry document
    pub registry_path: PathBuf,
    /// Lock and fsync settings for registry writes and file propagation
    pub robustness: RobustnessConfig,
}

/// On-disk shape of the optional settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    registry: Option<PathBuf>,
    robustness: RobustnessSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RobustnessSettings {
    lock_timeout_ms: Option<u64>,
    enable_fsync: Option<bool>,
}

impl SyncConfig {
    /// Configuration using a specific registry document and default I/O settings.
    pub fn new(registry_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
            robustness: RobustnessConfig::default(),
        }
    }

    /// Resolve configuration for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeNotFound`] if no home directory is known, or a
    /// filesystem error if the settings file exists but cannot be parsed.
    pub fn resolve(registry_override: Option<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Self::resolve_in(&home, registry_override)
    }

    /// Resolve configuration relative to an explicit home directory.
    pub fn resolve_in(home: &Path, registry_override: Option<PathBuf>) -> Result<Self> {
        let settings_path = FilesyncPath::Settings.under_home(home);
        let settings: Settings = if settings_path.is_file() {
            tracing::debug!(path = %settings_path.display(), "loading settings");
            ConfigStore::new().load(&settings_path)?
        } else {
            Settings::default()
        };

        let defaults = RobustnessConfig::default();
        let robustness = RobustnessConfig {
            lock_timeout: settings
                .robustness
                .lock_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_timeout),
            enable_fsync: settings
                .robustness
                .enable_fsync
                .unwrap_or(defaults.enable_fsync),
        };

        let registry_path = registry_override
            .or(settings.registry)
            .unwrap_or_else(|| FilesyncPath::Registry.under_home(home));

        Ok(Self {
            registry_path,
            robustness,
        })
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_registry_under_home() {
        let home = tempdir().unwrap();

        let config = SyncConfig::resolve_in(home.path(), None).unwrap();

        assert_eq!(
            config.registry_path,
            home.path().join(".config/filesync/synclist.json")
        );
        assert_eq!(config.robustness, RobustnessConfig::default());
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let home = tempdir().unwrap();
        let dir = home.path().join(".config/filesync");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.toml"),
            "registry = \"/srv/mirror.json\"\n\n[robustness]\nlock_timeout_ms = 250\nenable_fsync = false\n",
        )
        .unwrap();

        let config = SyncConfig::resolve_in(home.path(), None).unwrap();

        assert_eq!(config.registry_path, PathBuf::from("/srv/mirror.json"));
        assert_eq!(config.robustness.lock_timeout, Duration::from_millis(250));
        assert!(!config.robustness.enable_fsync);
    }

    #[test]
    fn explicit_override_wins_over_settings() {
        let home = tempdir().unwrap();
        let dir = home.path().join(".config/filesync");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "registry = \"/srv/mirror.json\"\n").unwrap();

        let config =
            SyncConfig::resolve_in(home.path(), Some(PathBuf::from("/tmp/other.json"))).unwrap();

        assert_eq!(config.registry_path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn unknown_settings_key_is_an_error() {
        let home = tempdir().unwrap();
        let dir = home.path().join(".config/filesync");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "regsitry = \"/typo.json\"\n").unwrap();

        assert!(SyncConfig::resolve_in(home.path(), None).is_err());
    }
}
