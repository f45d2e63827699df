//! Synchronization module
//!
//! Provides the [`SyncEngine`] that registers origins and copies, detects
//! change through stored digests, and propagates origin content to copies.

mod engine;
mod report;
mod status;

pub use engine::SyncEngine;
pub use report::{CopyAction, DeleteReport, SyncReport};
pub use status::CopyStatus;
