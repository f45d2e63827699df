//! Sync and update command implementations
//!
//! `sync` propagates origin content to copies; `update` only refreshes the
//! stored digests so that `list` and later syncs see current state.

use std::path::PathBuf;

use colored::Colorize;
use filesync_core::{SyncEngine, SyncReport};

use crate::cli::Targets;
use crate::context::{expand_targets, is_skippable, warn};
use crate::error::Result;

/// Run the sync command
pub fn run_sync(engine: &SyncEngine, targets: &Targets) -> Result<()> {
    println!("{} Synchronizing copies...", "=>".blue().bold());

    if targets.all {
        let report = engine.sync_all()?;
        for origin in &report.skipped {
            warn(&format!("origin {} is missing, skipped", origin));
        }
        print_report(&report);
        return Ok(());
    }

    let mut total = SyncReport::default();
    for origin in expand_targets(engine, targets)? {
        match engine.sync(&origin) {
            Ok(report) => {
                total.copied.extend(report.copied);
                total.materialized.extend(report.materialized);
            }
            Err(e) if is_skippable(&e) => warn(&e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }
    print_report(&total);

    Ok(())
}

/// Run the update command
///
/// Refreshes origin digests for the targets, then every copy digest.
pub fn run_update(engine: &SyncEngine, targets: &Targets) -> Result<()> {
    let origins: Vec<PathBuf> = expand_targets(engine, targets)?;

    let mut updated = 0;
    for origin in &origins {
        match engine.update_origin_digest(origin) {
            Ok(()) => updated += 1,
            Err(e) if is_skippable(&e) => warn(&e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }

    let report = engine.update_all_digests()?;
    for path in &report.materialized {
        println!("   {} {}", "+".green(), path);
    }
    println!(
        "{} Updated {} origin digest(s) and {} copy digest(s).",
        "OK".green().bold(),
        updated,
        report.refreshed
    );

    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.copied.is_empty() {
        println!("{} Everything is up to date.", "OK".green().bold());
        return;
    }

    for action in &report.copied {
        println!(
            "   {} {} {} {}",
            "~".yellow(),
            action.origin.dimmed(),
            "->".dimmed(),
            action.copy.cyan()
        );
    }
    println!(
        "{} Copied {} file(s).",
        "OK".green().bold(),
        report.copied.len()
    );
}
