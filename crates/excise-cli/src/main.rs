//! excise CLI
//!
//! Removes named blocks of text from schema snapshots and migrations.

mod cli;
mod commands;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::ApplyOptions;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr so stdout stays clean for reports and JSON.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(verbose)
        .with_writer(io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Remove named blocks of text from files", "excise".green().bold());
            println!();
            println!("Run {} for available commands.", "excise --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply {
            file,
            source,
            strict,
            dry_run,
            json,
        } => commands::run_apply(
            &file,
            &source,
            ApplyOptions {
                strict,
                dry_run,
                json,
            },
        ),
        Commands::ListRules { json } => commands::run_list_rules(json),
        Commands::ShowRules { id } => commands::run_show_rules(&id),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "excise", &mut io::stdout());
            Ok(())
        }
    }
}
