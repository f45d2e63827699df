//! Error types for filesync-core

use std::path::PathBuf;

/// Result type for filesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filesync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File is missing or is not a readable regular file
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Origin is not registered
    #[error("\"{}\" is not in origins.", origin.display())]
    OriginNotFound { origin: PathBuf },

    /// Copy is not registered under the origin
    #[error("\"{}\" is not in copies of \"{}\".", copy.display(), origin.display())]
    CopyNotFound { origin: PathBuf, copy: PathBuf },

    /// Registry target has the wrong extension or shape
    #[error("Invalid registry store at {path}: {reason}")]
    InvalidStoreFormat { path: PathBuf, reason: String },

    /// No home directory to place the default registry under
    #[error("Could not determine the home directory")]
    HomeNotFound,

    /// Registry and filesystem disagree in a way normal operation prevents
    #[error("Internal invariant violated: {message}")]
    InvariantViolation { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from filesync-fs
    #[error(transparent)]
    Fs(filesync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the per-item lookup failures batch operations report and skip.
    pub fn is_missing_entry(&self) -> bool {
        matches!(self, Self::OriginNotFound { .. } | Self::CopyNotFound { .. })
    }
}

impl From<filesync_fs::Error> for Error {
    fn from(error: filesync_fs::Error) -> Self {
        match error {
            filesync_fs::Error::NotFound { path } => Self::NotFound { path },
            other => Self::Fs(other),
        }
    }
}
