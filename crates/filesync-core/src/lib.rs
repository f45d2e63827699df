//! Synchronization state engine for filesync
//!
//! This crate sits between the command surface and the filesystem layer:
//!
//! - **Registry**: the persisted origin → copies document with stored digests
//! - **SyncEngine**: registration, change detection and copy propagation
//! - **SyncConfig**: explicit configuration (registry location, I/O tuning)
//!
//! ```text
//!                  filesync-cli
//!                       |
//!                 filesync-core
//!              (SyncEngine, Registry)
//!                       |
//!                  filesync-fs
//!     (digests, canonical paths, atomic I/O)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use filesync_core::{SyncConfig, SyncEngine};
//!
//! fn example() -> filesync_core::Result<()> {
//!     let engine = SyncEngine::new(SyncConfig::resolve(None)?)?;
//!     engine.add("notes.md", &["backup/notes.md"])?;
//!     engine.sync("notes.md")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod sync;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use registry::{CopyRecord, OriginRecord, Registry, RegistryDocument};
pub use sync::{CopyAction, CopyStatus, DeleteReport, SyncEngine, SyncReport};
