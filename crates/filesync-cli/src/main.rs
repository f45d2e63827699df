//! filesync CLI
//!
//! The command-line interface for registering origins and keeping their
//! copies in sync.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.registry),
        None => {
            println!("{} keeps copies in sync with their origin", "filesync".green().bold());
            println!();
            println!("Run {} for available commands.", "filesync --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
        tracing::debug!("Verbose mode enabled");
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

fn execute_command(cmd: Commands, registry: Option<std::path::PathBuf>) -> Result<()> {
    if let Commands::Completions { shell } = cmd {
        clap_complete::generate(shell, &mut Cli::command(), "filesync", &mut std::io::stdout());
        return Ok(());
    }

    let engine = context::open_engine(registry)?;

    match cmd {
        Commands::Add { origin, copies } => commands::run_add(&engine, &origin, &copies),
        Commands::Delete { origin, copies } => commands::run_delete(&engine, &origin, &copies),
        Commands::Sync { targets } => commands::run_sync(&engine, &targets),
        Commands::Update { targets } => commands::run_update(&engine, &targets),
        Commands::List { targets, json } => commands::run_list(&engine, &targets, json),
        Commands::Completions { .. } => Ok(()),
    }
}
