//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::{Error, Result};

/// Tuning for locked, atomic writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up
    pub lock_timeout: Duration,
    /// Whether to fsync the staged file before renaming it into place
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Holds an advisory lock on `<path>.lock` for the duration of the write.
/// The lock file is left behind for later writers to lock.
pub fn write_atomic(path: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    stage_and_rename(path, config, |temp_file, temp_path| {
        temp_file
            .write_all(content)
            .map_err(|e| Error::io(temp_path, e))
    })
}

/// Copy `source` over `destination` atomically.
///
/// The destination is replaced in one rename, so readers see either the old
/// or the new content. Missing parent directories of `destination` are created.
pub fn copy_atomic(source: &Path, destination: &Path, config: RobustnessConfig) -> Result<()> {
    let mut reader = File::open(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: source.to_path_buf(),
        },
        _ => Error::io(source, e),
    })?;
    let permissions = reader
        .metadata()
        .map_err(|e| Error::io(source, e))?
        .permissions();

    // Permission bits follow the source, like `cp`
    stage_and_rename(destination, config, |temp_file, temp_path| {
        std::io::copy(&mut reader, temp_file).map_err(|e| Error::io(temp_path, e))?;
        temp_file
            .set_permissions(permissions)
            .map_err(|e| Error::io(temp_path, e))
    })?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        "copied file"
    );
    Ok(())
}

/// Create an empty file at `path`, with all missing parent directories,
/// unless a regular file is already there.
///
/// Returns `true` if the file was created.
pub fn ensure_file_exists(path: &Path) -> Result<bool> {
    if path.is_file() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    tracing::debug!(path = %path.display(), "materialized empty file");
    Ok(true)
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically with default settings.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

fn lock_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

fn acquire_lock(path: &Path, config: RobustnessConfig) -> Result<File> {
    let lock_path = lock_path(path);
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| Error::io(&lock_path, e))?;

    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(250))
        .with_max_elapsed_time(Some(config.lock_timeout))
        .build();

    backoff::retry(policy, || {
        lock_file
            .try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    Ok(lock_file)
}

fn stage_and_rename<F>(path: &Path, config: RobustnessConfig, fill: F) -> Result<()>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let lock_file = acquire_lock(path, config)?;
    let temp_path = temp_path(path);

    let result = (|| {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io(&temp_path, e))?;

        fill(&mut temp_file, &temp_path)?;

        if config.enable_fsync {
            temp_file
                .sync_all()
                .map_err(|e| Error::io(&temp_path, e))?;
        }
        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    // Never unlinked: a waiter may already hold a handle to this inode.
    let _ = lock_file.unlock();

    result
}
