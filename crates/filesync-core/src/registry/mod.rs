//! Registry store for origins, copies and their stored digests
//!
//! The registry is persisted as a single pretty-printed JSON document. Every
//! operation reads the whole document, applies its change and writes the
//! whole document back through an atomic, locked write, so no later operation
//! can observe a partially written state.
//!
//! There is no lock held across the read-modify-write cycle: two processes
//! mutating the same registry concurrently can lose updates. The registry is
//! meant for a single writer.

mod record;

pub use record::{CopyRecord, OriginRecord, RegistryDocument};

use std::path::{Path, PathBuf};

use filesync_fs::{CanonicalPath, ConfigStore, Digest, RobustnessConfig, io};

use crate::{Error, Result};

/// Durable origin → copies mapping.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
    store: ConfigStore,
}

impl Registry {
    /// Open the registry document at `path`, creating it as `{}` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStoreFormat`] if the file name does not end in
    /// `.json`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_robustness(path, RobustnessConfig::default())
    }

    /// Open the registry with custom write settings.
    pub fn with_robustness(path: impl Into<PathBuf>, robustness: RobustnessConfig) -> Result<Self> {
        let path = path.into();

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(Error::InvalidStoreFormat {
                path,
                reason: "registry file name must end in .json".into(),
            });
        }

        if !path.exists() {
            io::write_atomic(&path, b"{}", robustness)?;
            tracing::info!(path = %path.display(), "created empty registry");
        }

        Ok(Self {
            path,
            store: ConfigStore::with_robustness(robustness),
        })
    }

    /// Location of the registry document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document.
    pub fn load(&self) -> Result<RegistryDocument> {
        self.store.load(&self.path).map_err(|e| match e {
            filesync_fs::Error::ConfigParse { path, message, .. } => Error::InvalidStoreFormat {
                path,
                reason: message,
            },
            other => other.into(),
        })
    }

    fn save(&self, document: &RegistryDocument) -> Result<()> {
        self.store.save(&self.path, document)?;
        Ok(())
    }

    /// Read, apply `change`, and write back. Nothing is written if `change` fails.
    fn update<T>(&self, change: impl FnOnce(&mut RegistryDocument) -> Result<T>) -> Result<T> {
        let mut document = self.load()?;
        let value = change(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }

    pub fn exists_origin(&self, origin: &CanonicalPath) -> Result<bool> {
        Ok(self.load()?.contains_key(&origin.as_key()))
    }

    /// # Errors
    ///
    /// Returns [`Error::OriginNotFound`] if the origin is not registered.
    pub fn exists_copy(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<bool> {
        let document = self.load()?;
        let record = origin_record(&document, origin)?;
        Ok(record.copies.contains_key(&copy.as_key()))
    }

    /// Precondition guard: the origin, and the copy if given, are registered.
    pub fn check_existing(&self, origin: &CanonicalPath, copy: Option<&CanonicalPath>) -> Result<()> {
        let document = self.load()?;
        check_in(&document, origin, copy)
    }

    /// Register an origin with no digest and no copies. No-op if present.
    pub fn add_origin(&self, origin: &CanonicalPath) -> Result<()> {
        self.update(|document| {
            if !document.contains_key(&origin.as_key()) {
                document.insert(origin.as_key(), OriginRecord::default());
                tracing::info!(origin = %origin, "registered origin");
            }
            Ok(())
        })
    }

    /// Register a copy under an existing origin. No-op if present.
    pub fn add_copy(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<()> {
        self.update(|document| {
            let record = origin_record_mut(document, origin)?;
            if !record.copies.contains_key(&copy.as_key()) {
                record.copies.insert(copy.as_key(), CopyRecord::default());
                tracing::info!(origin = %origin, copy = %copy, "registered copy");
            }
            Ok(())
        })
    }

    /// Remove an origin together with all of its copies.
    pub fn remove_origin(&self, origin: &CanonicalPath) -> Result<()> {
        self.update(|document| {
            check_in(document, origin, None)?;
            document.shift_remove(&origin.as_key());
            tracing::info!(origin = %origin, "removed origin");
            Ok(())
        })
    }

    /// Remove a single copy from an origin.
    pub fn remove_copy(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<()> {
        self.update(|document| {
            check_in(document, origin, Some(copy))?;
            origin_record_mut(document, origin)?
                .copies
                .shift_remove(&copy.as_key());
            tracing::info!(origin = %origin, copy = %copy, "removed copy");
            Ok(())
        })
    }

    /// All origins in insertion order.
    pub fn get_origins(&self) -> Result<Vec<CanonicalPath>> {
        Ok(self
            .load()?
            .keys()
            .map(CanonicalPath::from_canonical)
            .collect())
    }

    /// Copies of an origin in insertion order.
    pub fn get_copies(&self, origin: &CanonicalPath) -> Result<Vec<CanonicalPath>> {
        let document = self.load()?;
        Ok(origin_record(&document, origin)?
            .copies
            .keys()
            .map(CanonicalPath::from_canonical)
            .collect())
    }

    pub fn get_origin_digest(&self, origin: &CanonicalPath) -> Result<Option<Digest>> {
        let document = self.load()?;
        Ok(origin_record(&document, origin)?.hash.clone())
    }

    pub fn get_copy_digest(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<Option<Digest>> {
        let document = self.load()?;
        check_in(&document, origin, Some(copy))?;
        Ok(document[&origin.as_key()].copies[&copy.as_key()].hash.clone())
    }

    pub fn set_origin_digest(&self, origin: &CanonicalPath, value: Option<Digest>) -> Result<()> {
        self.update(|document| {
            origin_record_mut(document, origin)?.hash = value;
            Ok(())
        })
    }

    pub fn set_copy_digest(
        &self,
        origin: &CanonicalPath,
        copy: &CanonicalPath,
        value: Option<Digest>,
    ) -> Result<()> {
        self.update(|document| {
            check_in(document, origin, Some(copy))?;
            let record = origin_record_mut(document, origin)?;
            if let Some(copy_record) = record.copies.get_mut(&copy.as_key()) {
                copy_record.hash = value;
            }
            Ok(())
        })
    }

    /// Copies whose stored digest differs from the origin's stored digest.
    /// A missing digest on either side counts as a difference.
    pub fn get_changed_copies(&self, origin: &CanonicalPath) -> Result<Vec<CanonicalPath>> {
        let document = self.load()?;
        Ok(origin_record(&document, origin)?
            .changed_copies()
            .map(CanonicalPath::from_canonical)
            .collect())
    }

    /// Origins with at least one changed copy.
    pub fn get_all_changed_origins(&self) -> Result<Vec<CanonicalPath>> {
        Ok(self
            .load()?
            .iter()
            .filter(|(_, record)| record.changed_copies().next().is_some())
            .map(|(key, _)| CanonicalPath::from_canonical(key))
            .collect())
    }

    /// True iff both stored digests are present and equal.
    pub fn compare_digests(&self, origin: &CanonicalPath, copy: &CanonicalPath) -> Result<bool> {
        let document = self.load()?;
        check_in(&document, origin, Some(copy))?;
        let record = &document[&origin.as_key()];
        Ok(record::digests_match(
            record.hash.as_ref(),
            record.copies[&copy.as_key()].hash.as_ref(),
        ))
    }
}

fn check_in(
    document: &RegistryDocument,
    origin: &CanonicalPath,
    copy: Option<&CanonicalPath>,
) -> Result<()> {
    let record = origin_record(document, origin)?;
    if let Some(copy) = copy
        && !record.copies.contains_key(&copy.as_key())
    {
        return Err(Error::CopyNotFound {
            origin: origin.to_native(),
            copy: copy.to_native(),
        });
    }
    Ok(())
}

fn origin_record<'a>(document: &'a RegistryDocument, origin: &CanonicalPath) -> Result<&'a OriginRecord> {
    document
        .get(&origin.as_key())
        .ok_or_else(|| Error::OriginNotFound {
            origin: origin.to_native(),
        })
}

fn origin_record_mut<'a>(
    document: &'a mut RegistryDocument,
    origin: &CanonicalPath,
) -> Result<&'a mut OriginRecord> {
    document
        .get_mut(&origin.as_key())
        .ok_or_else(|| Error::OriginNotFound {
            origin: origin.to_native(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesync_fs::compute_content_checksum;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn key(path: &str) -> CanonicalPath {
        CanonicalPath::from_canonical(path)
    }

    #[test]
    fn fresh_registry_is_empty_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("synclist.json");

        Registry::open(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn open_keeps_existing_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synclist.json");
        std::fs::write(&path, r#"{"/a": {"hash": null, "copies": {}}}"#).unwrap();

        let registry = Registry::open(&path).unwrap();

        assert_eq!(registry.get_origins().unwrap(), vec![key("/a")]);
    }

    #[test]
    fn non_json_target_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synclist.toml");

        let result = Registry::open(&path);

        assert!(matches!(result, Err(Error::InvalidStoreFormat { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_document_is_invalid_store_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synclist.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let registry = Registry::open(&path).unwrap();

        assert!(matches!(registry.load(), Err(Error::InvalidStoreFormat { .. })));
    }

    #[test]
    fn set_copy_digest_requires_registered_copy() {
        let dir = tempdir().unwrap();
        let registry = Registry::open(dir.path().join("synclist.json")).unwrap();
        registry.add_origin(&key("/a")).unwrap();

        let result = registry.set_copy_digest(&key("/a"), &key("/b"), Some(compute_content_checksum(b"")));

        assert!(matches!(result, Err(Error::CopyNotFound { .. })));
    }

    #[test]
    fn failed_update_leaves_document_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synclist.json");
        let registry = Registry::open(&path).unwrap();
        registry.add_origin(&key("/a")).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(registry.remove_copy(&key("/a"), &key("/missing")).is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
