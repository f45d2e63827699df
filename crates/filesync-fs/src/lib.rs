//! Filesystem layer for filesync
//!
//! Provides canonical path handling, content digests, and safe I/O
//! operations used by the registry and the synchronization engine.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{Digest, compute_content_checksum, compute_file_checksum};
pub use config::ConfigStore;
pub use constants::FilesyncPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::CanonicalPath;
