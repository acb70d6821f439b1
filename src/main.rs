//! Binary entry point for seengate.
//!
//! This binary provides the CLI interface for the seen-movies filter.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use seengate::cli::{self, FilterArgs, OutputFormat};
use seengate::config::{Matching, ScopeSetting, SeengateConfig};
use seengate::observability;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Seengate - remembers accepted movies so feeds never deliver them twice.
#[derive(Parser)]
#[command(name = "seengate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the seen-record database.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run items from a JSON file through the pipeline.
    Filter {
        /// JSON file with an array of items.
        items: PathBuf,

        /// Task name (partition key for local scope).
        #[arg(short, long)]
        task: Option<String>,

        /// Identifier strictness.
        #[arg(short, long, value_parser = ["strict", "loose"])]
        matching: Option<String>,

        /// Memory scope.
        #[arg(short, long, value_parser = ["global", "local"])]
        scope: Option<String>,

        /// Evaluate without recording accepted movies.
        #[arg(long)]
        dry_run: bool,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Forget seen records by identifier value or title.
    Forget {
        /// Identifier value or exact title.
        value: String,
    },

    /// Search seen records by value or title.
    Search {
        /// Case-insensitive substring.
        pattern: String,

        /// Maximum number of results.
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show database status.
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.database.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(Some(&config.logging), cli.verbose) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: SeengateConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Filter {
            items,
            task,
            matching,
            scope,
            dry_run,
            format,
        } => {
            let args = FilterArgs {
                items_path: items,
                task,
                matching: matching.as_deref().and_then(Matching::parse),
                scope: scope.as_deref().and_then(ScopeSetting::parse),
                dry_run,
                format: parse_format(&format),
            };
            cli::cmd_filter(&config, &args)
        },

        Commands::Forget { value } => {
            let store = cli::open_store(&config)?;
            cli::cmd_forget(&mut io::stdout().lock(), &store, &value).map(|_| ())
        },

        Commands::Search {
            pattern,
            limit,
            format,
        } => {
            let store = cli::open_store(&config)?;
            cli::cmd_search(
                &mut io::stdout().lock(),
                &store,
                &pattern,
                limit,
                parse_format(&format),
            )
            .map(|_| ())
        },

        Commands::Status => {
            let store = cli::open_store(&config)?;
            cli::cmd_status(&mut io::stdout().lock(), &config, &store).map(|_| ())
        },
    }
}

/// Loads configuration from file and environment.
fn load_config(
    path: Option<&str>,
    database: Option<PathBuf>,
) -> Result<SeengateConfig, Box<dyn std::error::Error>> {
    let config = if let Some(config_path) = path {
        SeengateConfig::load_from_file(std::path::Path::new(config_path))?
    } else {
        SeengateConfig::load_default()
    };

    let config = config.with_env_overrides();
    Ok(match database {
        Some(database) => config.with_database_path(database),
        None => config,
    })
}

/// Parses output format string.
fn parse_format(s: &str) -> OutputFormat {
    s.parse().unwrap_or_default()
}
