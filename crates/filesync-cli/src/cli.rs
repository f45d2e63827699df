//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// filesync - Keep copies of files in sync with their origin
#[derive(Parser, Debug)]
#[command(name = "filesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry document to use instead of ~/.config/filesync/synclist.json
    #[arg(long, global = true, env = "FILESYNC_REGISTRY", value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register an origin file and the copies that mirror it
    ///
    /// Examples:
    ///   filesync add notes.md ~/backup/notes.md
    ///   filesync add .bashrc ~/dotfiles/bashrc /mnt/usb/bashrc
    Add {
        /// Origin file
        origin: PathBuf,

        /// Copy destinations (need not exist yet)
        #[arg(required = true)]
        copies: Vec<PathBuf>,
    },

    /// Unregister an origin, or only some of its copies
    ///
    /// Files on disk are left untouched.
    Delete {
        /// Origin file
        origin: PathBuf,

        /// Copies to unregister (all of the origin when omitted)
        copies: Vec<PathBuf>,
    },

    /// Copy origin content onto its copies
    Sync {
        #[command(flatten)]
        targets: Targets,
    },

    /// Refresh stored digests without copying
    Update {
        #[command(flatten)]
        targets: Targets,
    },

    /// Show registered origins, their copies and live status
    List {
        #[command(flatten)]
        targets: Targets,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   filesync completions bash > ~/.local/share/bash-completion/completions/filesync
    ///   filesync completions zsh > ~/.zfunc/_filesync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which origins a command applies to.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    /// Origin files, or directories whose registered children to use
    pub paths: Vec<PathBuf>,

    /// Apply to every registered origin
    #[arg(short = 'A', long, conflicts_with = "paths")]
    pub all: bool,
}
