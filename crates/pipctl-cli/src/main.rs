//! pipctl CLI
//!
//! Thin front end over pipctl-core: parses flags, merges config defaults and
//! relays pip's output.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use pipctl_core::{Pip, PipConfig};

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        return Err(CliError::user(format!("failed to set up logging: {}", e)));
    }

    let config = match &cli.config {
        Some(path) => PipConfig::load(path)?,
        None => PipConfig::discover()?,
    };
    tracing::debug!(bin_env = ?config.bin_env, "configuration loaded");

    let pip = Pip::system(Box::new(config.cache.build()));

    match cli.command {
        Commands::Install(args) => commands::run_install(&pip, args, &config),
        Commands::Uninstall(args) => commands::run_uninstall(&pip, args, &config),
        Commands::Freeze { target } => commands::run_freeze(&pip, target, &config),
        Commands::List {
            prefix,
            json,
            target,
        } => commands::run_list(&pip, prefix.as_deref(), json, target, &config),
    }
}
