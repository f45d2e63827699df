//! Reports returned by engine operations

use filesync_fs::CanonicalPath;
use serde::Serialize;

/// A single propagation of origin content onto a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyAction {
    pub origin: String,
    pub copy: String,
}

impl CopyAction {
    pub(crate) fn new(origin: &CanonicalPath, copy: &CanonicalPath) -> Self {
        Self {
            origin: origin.as_key(),
            copy: copy.as_key(),
        }
    }
}

/// Report from a sync or digest refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Copies overwritten with origin content
    pub copied: Vec<CopyAction>,
    /// Copy files created empty because they did not exist
    pub materialized: Vec<String>,
    /// Number of copy digests recomputed and stored
    pub refreshed: usize,
    /// Origins skipped because their file could not be read
    pub skipped: Vec<String>,
}

impl SyncReport {
    pub(crate) fn merge(&mut self, other: SyncReport) {
        self.copied.extend(other.copied);
        for path in other.materialized {
            if !self.materialized.contains(&path) {
                self.materialized.push(path);
            }
        }
        self.refreshed += other.refreshed;
        self.skipped.extend(other.skipped);
    }

    /// True when nothing was written to any copy.
    pub fn is_noop(&self) -> bool {
        self.copied.is_empty() && self.materialized.is_empty()
    }
}

/// Report from a delete batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Registry entries removed
    pub removed: Vec<String>,
    /// Per-item lookup failures that were reported and skipped
    pub skipped: Vec<String>,
}
