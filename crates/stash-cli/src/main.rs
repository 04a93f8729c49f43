//! Stash CLI
//!
//! Thin command-line front end over the stash attachment store.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

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

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let Some(command) = cli.command else {
        println!("{} local attachment store", "stash".green().bold());
        println!();
        println!("Run {} for available commands.", "stash --help".cyan());
        return Ok(());
    };

    let stash = commands::open_stash(cli.config.as_deref(), cli.base_dir)?;
    execute_command(&stash, command)
}

fn execute_command(stash: &stash_core::Stash, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { catalog } => commands::run_init(stash, catalog.as_deref()),
        Commands::Save { name, file } => commands::run_save(stash, &name, &file),
        Commands::SaveChunk { guid, index, file } => {
            commands::run_save_chunk(stash, &guid, index, &file)
        }
        Commands::DeleteChunks { guid } => commands::run_delete_chunks(stash, &guid),
        Commands::Remove { name } => commands::run_remove(stash, &name),
        Commands::Purge => commands::run_purge(stash),
        Commands::Reconstruct { guid, out } => {
            commands::run_reconstruct(stash, &guid, out.as_deref())
        }
        Commands::ReadRange {
            file,
            offset,
            length,
            out,
        } => commands::run_read_range(stash, &file, offset, length, out.as_deref()),
        Commands::Credential { action } => commands::run_credential(stash, action),
        Commands::Provision { catalog } => commands::run_provision(stash, &catalog),
    }
}
