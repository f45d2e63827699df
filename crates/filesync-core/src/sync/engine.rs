//! SyncEngine implementation
//!
//! The SyncEngine coordinates state between the registry (stored digests)
//! and the filesystem (origin and copy files).

use std::path::Path;

use filesync_fs::{CanonicalPath, RobustnessConfig, compute_file_checksum, io};

use crate::config::SyncConfig;
use crate::registry::Registry;
use crate::{Error, Result};

use super::report::{CopyAction, DeleteReport, SyncReport};
use super::status::CopyStatus;

/// Engine for registering and synchronizing origins and their copies
///
/// All paths accepted by public methods are canonicalized before they are
/// used as registry keys, so the caller's working directory and spelling of
/// a path do not matter.
///
/// Both `sync` and `sync_all` refresh the stored origin digest before
/// propagating, so an origin edited since it was added is detected as
/// changed relative to its copies.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    registry: Registry,
    robustness: RobustnessConfig,
}

impl SyncEngine {
    /// Create a new SyncEngine, opening (or creating) the registry document.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry path is not a `.json` file or cannot
    /// be created.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let registry = Registry::with_robustness(&config.registry_path, config.robustness)?;
        Ok(Self {
            registry,
            robustness: config.robustness,
        })
    }

    /// The underlying registry store.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register `origin` and `copies`.
    ///
    /// The origin digest is computed and stored immediately. Copies that
    /// already exist as regular files are hashed too; the others keep a null
    /// digest until they are materialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the origin is not a readable regular
    /// file, or a filesystem error if any path cannot be canonicalized.
    /// Nothing is registered in either case.
    pub fn add<P, C>(&self, origin: P, copies: &[C]) -> Result<()>
    where
        P: AsRef<Path>,
        C: AsRef<Path>,
    {
        let origin = CanonicalPath::resolve(origin)?;
        let copies = copies
            .iter()
            .map(CanonicalPath::resolve)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let digest = compute_file_checksum(origin.as_path())?;

        self.registry.add_origin(&origin)?;
        self.registry.set_origin_digest(&origin, Some(digest))?;

        for copy in copies {
            self.registry.add_copy(&origin, &copy)?;
            if copy.is_file() {
                let digest = compute_file_checksum(copy.as_path())?;
                self.registry.set_copy_digest(&origin, &copy, Some(digest))?;
            }
        }

        Ok(())
    }

    /// Unregister `origin` entirely, or only the listed `copies`.
    ///
    /// Only registry entries are removed; no file is touched. Entries that
    /// are not registered are logged and skipped so the rest of the batch
    /// still applies.
    pub fn delete<P, C>(&self, origin: P, copies: &[C]) -> Result<DeleteReport>
    where
        P: AsRef<Path>,
        C: AsRef<Path>,
    {
        let origin = CanonicalPath::resolve(origin)?;
        let mut report = DeleteReport::default();

        if copies.is_empty() {
            match self.registry.remove_origin(&origin) {
                Ok(()) => report.removed.push(origin.as_key()),
                Err(e) if e.is_missing_entry() => {
                    tracing::warn!("{}", e);
                    report.skipped.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
            return Ok(report);
        }

        for copy in copies {
            let copy = CanonicalPath::resolve(copy)?;
            match self.registry.remove_copy(&origin, &copy) {
                Ok(()) => report.removed.push(copy.as_key()),
                Err(e) if e.is_missing_entry() => {
                    tracing::warn!("{}", e);
                    report.skipped.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Recompute and store the digest of a registered origin.
    pub fn update_origin_digest<P: AsRef<Path>>(&self, origin: P) -> Result<()> {
        let origin = CanonicalPath::resolve(origin)?;
        self.refresh_origin_digest(&origin)
    }

    /// Materialize every registered copy and store fresh copy digests.
    ///
    /// Origin digests are left as they are.
    pub fn update_all_digests(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for origin in self.registry.get_origins()? {
            for copy in self.registry.get_copies(&origin)? {
                if io::ensure_file_exists(copy.as_path())? {
                    report.materialized.push(copy.as_key());
                }
            }
            report.refreshed += self.set_copies_digests(&origin)?;
        }

        tracing::debug!(refreshed = report.refreshed, "updated copy digests");
        Ok(report)
    }

    /// Overwrite every copy of `origin` with the origin's content.
    pub fn sync<P: AsRef<Path>>(&self, origin: P) -> Result<SyncReport> {
        let origin = CanonicalPath::resolve(origin)?;
        self.registry.check_existing(&origin, None)?;
        self.refresh_origin_digest(&origin)?;

        let mut report = self.update_all_digests()?;

        for copy in self.registry.get_copies(&origin)? {
            self.propagate(&origin, &copy)?;
            report.copied.push(CopyAction::new(&origin, &copy));
        }

        report.merge(self.update_all_digests()?);
        tracing::info!(origin = %origin, copies = report.copied.len(), "synchronized origin");
        Ok(report)
    }

    /// Bring every changed copy of every origin up to date.
    ///
    /// Origins whose file can no longer be read are skipped and reported.
    pub fn sync_all(&self) -> Result<SyncReport> {
        let mut skipped = Vec::new();
        for origin in self.registry.get_origins()? {
            match self.refresh_origin_digest(&origin) {
                Ok(()) => {}
                Err(Error::NotFound { path }) => {
                    tracing::warn!(origin = %path.display(), "origin is missing, skipping");
                    skipped.push(origin.as_key());
                }
                Err(e) => return Err(e),
            }
        }

        let mut report = self.update_all_digests()?;
        report.skipped = skipped;

        for origin in self.registry.get_origins()? {
            if report.skipped.contains(&origin.as_key()) {
                continue;
            }
            for copy in self.registry.get_changed_copies(&origin)? {
                self.propagate(&origin, &copy)?;
                report.copied.push(CopyAction::new(&origin, &copy));
            }
        }

        report.merge(self.update_all_digests()?);
        tracing::info!(copies = report.copied.len(), "synchronized all origins");
        Ok(report)
    }

    /// Registered origins in registry order.
    pub fn get_origins(&self) -> Result<Vec<CanonicalPath>> {
        self.registry.get_origins()
    }

    /// Registered copies of `origin` in registry order.
    pub fn get_copies<P: AsRef<Path>>(&self, origin: P) -> Result<Vec<CanonicalPath>> {
        let origin = CanonicalPath::resolve(origin)?;
        self.registry.get_copies(&origin)
    }

    /// True if `path` canonicalizes to a registered origin.
    pub fn is_origin<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = CanonicalPath::resolve(path)?;
        self.registry.exists_origin(&path)
    }

    /// Compare live file content of `origin` and `copy`.
    ///
    /// Digests are recomputed from disk; stored digests are neither read nor
    /// written.
    pub fn get_copy_status<P, C>(&self, origin: P, copy: C) -> Result<CopyStatus>
    where
        P: AsRef<Path>,
        C: AsRef<Path>,
    {
        let copy = CanonicalPath::resolve(copy)?;
        if !copy.is_file() {
            return Ok(CopyStatus::NoCopy);
        }

        let origin = CanonicalPath::resolve(origin)?;
        let origin_digest = compute_file_checksum(origin.as_path())?;
        let copy_digest = compute_file_checksum(copy.as_path())?;

        Ok(if origin_digest == copy_digest {
            CopyStatus::Same
        } else {
            CopyStatus::Different
        })
    }

    /// Compare the stored digests of `origin` and `copy`.
    pub fn compare_digests<P, C>(&self, origin: P, copy: C) -> Result<bool>
    where
        P: AsRef<Path>,
        C: AsRef<Path>,
    {
        let origin = CanonicalPath::resolve(origin)?;
        let copy = CanonicalPath::resolve(copy)?;
        self.registry.compare_digests(&origin, &copy)
    }

    fn refresh_origin_digest(&self, origin: &CanonicalPath) -> Result<()> {
        self.registry.check_existing(origin, None)?;
        let digest = compute_file_checksum(origin.as_path())?;
        self.registry.set_origin_digest(origin, Some(digest))
    }

    fn set_copies_digests(&self, origin: &CanonicalPath) -> Result<usize> {
        let copies = self.registry.get_copies(origin)?;
        for copy in &copies {
            let digest = compute_file_checksum(copy.as_path()).map_err(|e| match e {
                filesync_fs::Error::NotFound { path } => Error::InvariantViolation {
                    message: format!("copy {} vanished after materialization", path.display()),
                },
                other => other.into(),
            })?;
            self.registry.set_copy_digest(origin, copy, Some(digest))?;
        }
        Ok(copies.len())
    }

    fn propagate(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<()> {
        tracing::debug!(origin = %origin, copy = %copy, "propagating");
        io::copy_atomic(origin.as_path(), copy.as_path(), self.robustness)?;
        Ok(())
    }
}
