//! CLI for the prodev user_data table

use clap::Parser;
use prodev::{BackendPreference, OlderThan, RetryConfig, SqlParam};
use prodev::concurrent::DEFAULT_OLDER_THAN;
use prodev::stream::{DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE};
use prodev_cli::{commands, effective_log_level, error::CliError, logging, resolve_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prodev")]
#[command(author, version, about = "Seed and stream the ALX_prodev user_data table", long_about = None)]
struct Cli {
    /// Config file path (JSON)
    #[arg(short, long, env = "PRODEV_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Backend to use: auto (MySQL, falling back to SQLite), mysql or sqlite
    #[arg(long, env = "PRODEV_BACKEND", global = true)]
    backend: Option<BackendPreference>,

    /// SQLite database file
    #[arg(long, env = "PRODEV_SQLITE_PATH", global = true)]
    sqlite_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    /// Defaults to the configured log_level
    #[arg(short, long, env = "PRODEV_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create user_data and load the CSV file into it
    Seed {
        /// CSV file (defaults to the configured csv_path)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print every user, one JSON line per row
    Stream {
        /// Stop after this many rows
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Read users in batches and keep those older than a threshold
    Batch {
        #[arg(long, short = 'b', default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: u64,
        /// Keep users strictly older than this age
        #[arg(long, default_value_t = OlderThan::DEFAULT_AGE)]
        older_than: u32,
    },
    /// Walk the table page by page
    Paginate {
        #[arg(long, short = 'p', default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u64,
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },
    /// Print the average age of all users
    AverageAge,
    /// Fetch all users and older users concurrently
    Concurrent {
        #[arg(long, default_value_t = DEFAULT_OLDER_THAN)]
        older_than: u32,
    },
    /// Run one query against a SQLite file in its own session
    Query {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,
        /// SQL returning user_id, name, email, age
        sql: String,
        /// Positional parameter (repeatable); integers bind as integers
        #[arg(long = "param", action = clap::ArgAction::Append)]
        params: Vec<SqlParam>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.backend, cli.sqlite_path.clone())?;

    // Initialize logging
    logging::init(effective_log_level(cli.log_level.as_deref(), &config));
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let mut out = std::io::stdout();
    match cli.command {
        Some(Commands::Seed { csv }) => {
            commands::run_seed(&mut out, &config, csv).await?;
        }
        Some(Commands::Stream { limit }) => {
            commands::run_stream(&mut out, &config, limit).await?;
        }
        Some(Commands::Batch {
            batch_size,
            older_than,
        }) => {
            commands::run_batch(&mut out, &config, batch_size, older_than).await?;
        }
        Some(Commands::Paginate {
            page_size,
            max_pages,
        }) => {
            commands::run_paginate(&mut out, &config, page_size, max_pages).await?;
        }
        Some(Commands::AverageAge) => {
            commands::run_average_age(&mut out, &config).await?;
        }
        Some(Commands::Concurrent { older_than }) => {
            commands::run_concurrent(&mut out, &config, older_than).await?;
        }
        Some(Commands::Query { db, sql, params }) => {
            let retry = RetryConfig::from(&config.retry);
            commands::run_query(&mut out, db, sql, params, &retry).await?;
        }
        None => {
            println!("prodev: seed and stream the user_data table");
            println!("Use --help for more information");
        }
    }

    Ok(())
}
