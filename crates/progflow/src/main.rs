//! Progflow CLI - program dependency flows from the command line.
//!
//! Reads a JSON export of the program spreadsheet and derives the
//! Sankey-ready flow records, a level outline, or the orphaned-program list.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Progflow: program dependency flow derivation.
#[derive(Parser)]
#[command(name = "progflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive Sankey-ready flow records from a JSON row export
    Flows {
        /// JSON file containing an array of program rows
        input: PathBuf,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum traversal depth (and breadcrumb slot count)
        #[arg(long, default_value_t = progflow::DEFAULT_MAX_LEVEL)]
        max_level: u32,

        /// Use the reversed breadcrumb layout (root in the last slot)
        #[arg(long)]
        leaf_aligned: bool,
    },

    /// Print the dependency outline, entry points first
    Levels {
        /// JSON file containing an array of program rows
        input: PathBuf,
    },

    /// List programs with no dependencies in either direction
    Orphans {
        /// JSON file containing an array of program rows
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Flows {
            input,
            output,
            max_level,
            leaf_aligned,
        } => cli::flows::run(&input, output.as_deref(), max_level, leaf_aligned),
        Commands::Levels { input } => cli::levels::run(&input),
        Commands::Orphans { input } => cli::orphans::run(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
