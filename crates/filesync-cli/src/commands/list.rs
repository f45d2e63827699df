//! List command implementation

use colored::Colorize;
use filesync_core::{CopyStatus, SyncEngine};
use filesync_fs::CanonicalPath;
use serde::Serialize;

use crate::cli::Targets;
use crate::context::{expand_targets, is_skippable, warn};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct OriginEntry {
    origin: String,
    exists: bool,
    copies: Vec<CopyEntry>,
}

#[derive(Debug, Serialize)]
struct CopyEntry {
    path: String,
    /// `None` when the origin itself cannot be read
    status: Option<CopyStatus>,
}

/// Run the list command
///
/// Statuses are computed from live file content; stored digests are not
/// modified.
pub fn run_list(engine: &SyncEngine, targets: &Targets, json: bool) -> Result<()> {
    let mut entries = Vec::new();

    for origin in expand_targets(engine, targets)? {
        let copies = match engine.get_copies(&origin) {
            Ok(copies) => copies,
            Err(e) if is_skippable(&e) => {
                warn(&e.to_string());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let exists = origin.is_file();
        let mut copy_entries = Vec::with_capacity(copies.len());
        for copy in copies {
            let status = if exists {
                Some(engine.get_copy_status(&origin, copy.as_path())?)
            } else {
                None
            };
            copy_entries.push(CopyEntry {
                path: copy.as_key(),
                status,
            });
        }

        entries.push(OriginEntry {
            origin: CanonicalPath::resolve(&origin)?.as_key(),
            exists,
            copies: copy_entries,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No origins registered.".dimmed());
        return Ok(());
    }

    for entry in &entries {
        if entry.exists {
            println!("{}", entry.origin.bold());
        } else {
            println!("{} {}", entry.origin.bold(), "(missing)".red());
        }
        for copy in &entry.copies {
            let status = match copy.status {
                Some(CopyStatus::Same) => "same".green(),
                Some(CopyStatus::Different) => "different".yellow(),
                Some(CopyStatus::NoCopy) => "no copy".red(),
                None => "unknown".dimmed(),
            };
            println!("   {:<10} {}", status, copy.path);
        }
    }

    println!();
    println!(
        "{} {} origin(s).",
        "Total:".dimmed(),
        entries.len()
    );

    Ok(())
}
