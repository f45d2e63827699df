//! Command context: engine construction and target expansion

use std::path::{Path, PathBuf};

use colored::Colorize;
use filesync_core::{Error, SyncConfig, SyncEngine};

use crate::cli::Targets;
use crate::error::{CliError, Result};

/// Build the engine from the resolved user configuration.
pub fn open_engine(registry: Option<PathBuf>) -> Result<SyncEngine> {
    let config = SyncConfig::resolve(registry)?;
    tracing::debug!(registry = %config.registry_path.display(), "opening registry");
    Ok(SyncEngine::new(config)?)
}

/// Expand command targets into origin paths.
///
/// `--all` yields every registered origin. A directory argument yields its
/// immediate children that are registered origins; any other path is passed
/// through so the command can report it if it is not registered.
pub fn expand_targets(engine: &SyncEngine, targets: &Targets) -> Result<Vec<PathBuf>> {
    if targets.all {
        return Ok(engine
            .get_origins()?
            .into_iter()
            .map(|origin| origin.to_native())
            .collect());
    }

    if targets.paths.is_empty() {
        return Err(CliError::user("No paths given. Pass origin paths or --all."));
    }

    let mut expanded = Vec::new();
    for path in &targets.paths {
        if path.is_dir() {
            let children = registered_children(engine, path)?;
            if children.is_empty() {
                warn(&format!("{} contains no registered origins", path.display()));
            }
            expanded.extend(children);
        } else {
            expanded.push(path.clone());
        }
    }
    Ok(expanded)
}

fn registered_children(engine: &SyncEngine, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && engine.is_origin(&path)? {
            children.push(path);
        }
    }
    children.sort();
    Ok(children)
}

/// Per-item failures that a batch reports and moves past.
pub fn is_skippable(error: &Error) -> bool {
    error.is_missing_entry() || matches!(error, Error::NotFound { .. })
}

/// Print a non-fatal warning to stderr.
pub fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
