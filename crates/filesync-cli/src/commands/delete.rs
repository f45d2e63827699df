//! Delete command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use filesync_core::SyncEngine;

use crate::context::warn;
use crate::error::Result;

/// Run the delete command
///
/// Removes registry entries only. Unregistered entries are reported and
/// the remaining ones are still removed.
pub fn run_delete(engine: &SyncEngine, origin: &Path, copies: &[PathBuf]) -> Result<()> {
    let report = engine.delete(origin, copies)?;

    for removed in &report.removed {
        println!("{} {}", "Removed".green().bold(), removed);
    }
    for skipped in &report.skipped {
        warn(skipped);
    }

    Ok(())
}
