//! Canonical path handling for registry keys
//!
//! Every origin and copy path is stored in its canonical form: absolute,
//! with `.`/`..` resolved and symlinks followed as far as the path exists.
//! Two spellings of the same file therefore produce the same key regardless
//! of the caller's working directory.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// An absolute, symlink-resolved path used as a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath {
    inner: PathBuf,
}

impl CanonicalPath {
    /// Canonicalize `path`.
    ///
    /// Existing paths are resolved with `dunce::canonicalize`. Paths that do
    /// not exist yet (copy destinations, typically) are resolved through the
    /// longest existing ancestor of the path as written; only the components
    /// below that ancestor are normalized lexically, since none of them can
    /// be a symlink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonUtf8Path`] if the resolved path is not valid
    /// UTF-8, as registry keys are JSON strings.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Ok(resolved) = dunce::canonicalize(path) {
            return Self::checked(resolved, path);
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
            cwd.join(path)
        };

        for ancestor in absolute.ancestors().skip(1) {
            let Ok(base) = dunce::canonicalize(ancestor) else {
                continue;
            };
            let tail = absolute.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return Self::checked(append_lexically(base, tail), path);
        }

        Err(Error::Unresolvable {
            path: path.to_path_buf(),
        })
    }

    fn checked(inner: PathBuf, original: &Path) -> Result<Self> {
        if inner.to_str().is_none() {
            return Err(Error::NonUtf8Path {
                path: original.to_path_buf(),
            });
        }
        Ok(Self { inner })
    }

    /// Wrap a path that is already canonical, such as a key read back from
    /// the registry document.
    pub fn from_canonical(path: impl Into<PathBuf>) -> Self {
        Self { inner: path.into() }
    }

    /// String form used as the registry key.
    ///
    /// Lossless for paths built by [`CanonicalPath::resolve`], which rejects
    /// non-UTF-8 paths.
    pub fn as_key(&self) -> String {
        self.inner.to_string_lossy().into_owned()
    }

    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        self.inner.clone()
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        self.inner.parent().map(|p| Self {
            inner: p.to_path_buf(),
        })
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.file_name().and_then(|n| n.to_str())
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn is_file(&self) -> bool {
        self.inner.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.inner.is_dir()
    }
}

/// Append `tail` to `base`, resolving `.` and `..` without touching the
/// filesystem.
fn append_lexically(base: PathBuf, tail: &Path) -> PathBuf {
    let mut out = base;
    for component in tail.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.display())
    }
}
