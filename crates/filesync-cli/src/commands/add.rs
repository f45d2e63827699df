//! Add command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use filesync_core::SyncEngine;

use crate::error::Result;

/// Run the add command
///
/// Registers the origin, stores its digest, and registers each copy.
pub fn run_add(engine: &SyncEngine, origin: &Path, copies: &[PathBuf]) -> Result<()> {
    engine.add(origin, copies)?;

    println!("{} {}", "Added".green().bold(), origin.display());
    for copy in copies {
        println!("   {} {}", "->".dimmed(), copy.display());
    }
    println!();
    println!("Run {} to create the copies.", "filesync sync <origin>".cyan());

    Ok(())
}
