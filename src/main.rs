//! Guardian Harvest main entry point
//!
//! This is the command-line interface for the Guardian Harvest collector.

use chrono::NaiveDate;
use clap::Parser;
use guardian_harvest::config::{load_config_with_hash, validate, Config};
use guardian_harvest::harvest::{generate_work_items, run_harvest};
use guardian_harvest::output::print_statistics;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Guardian Harvest: a bounded-retry article collector
///
/// Harvests one work item per day of the configured range from the Guardian
/// content API, requeueing failed days and abandoning them after a fixed
/// number of attempts.
#[derive(Parser, Debug)]
#[command(name = "guardian-harvest")]
#[command(version)]
#[command(about = "Harvest Guardian articles day by day", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the first day to harvest (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    start: Option<NaiveDate>,

    /// Override the last day to harvest (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    end: Option<NaiveDate>,

    /// Validate config and show the planned work without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load and validate configuration before logging so the log file is known
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(start) = cli.start {
        config.harvest.start_date = start;
    }
    if let Some(end) = cli.end {
        config.harvest.end_date = end;
    }
    validate(&config)?;

    setup_logging(cli.verbose, cli.quiet, config.output.log_path.as_deref())?;

    tracing::info!("The Guardian News Collector");
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(&config).await
}

/// Sets up the tracing subscriber based on verbosity level
///
/// With a log path the output is appended to that file without ANSI colors;
/// otherwise it goes to stderr.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("guardian_harvest=info,warn"),
            1 => EnvFilter::new("guardian_harvest=debug,info"),
            2 => EnvFilter::new("guardian_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    match log_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .init();
        }
    }

    Ok(())
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) {
    let queue = generate_work_items(
        config.harvest.start_date,
        config.harvest.end_date,
        config.harvest.tries_threshold,
    );

    println!("=== Guardian Harvest Dry Run ===\n");

    println!("Harvest:");
    println!(
        "  Range: {} to {} ({} work items)",
        config.harvest.start_date,
        config.harvest.end_date,
        queue.len()
    );
    println!("  Tries threshold: {}", config.harvest.tries_threshold);
    println!(
        "  Minimum request interval: {}ms",
        config.harvest.min_request_interval_ms
    );
    println!(
        "  Daily request quota: {}",
        config.harvest.daily_request_quota
    );

    println!("\nAPI:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Section: {}", config.api.section);
    println!("  Tag: {}", config.api.tag);
    println!("  Page size: {}", config.api.page_size);
    println!("  Order by: {}", config.api.order_by);
    println!("  Language: {}", config.api.lang);
    println!("  Content type kept: {}", config.api.content_type);

    println!("\nOutput:");
    println!("  Root: {}", config.output.root_dir);
    println!("  Backend: {:?}", config.output.backend);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(log) = &config.output.log_path {
        println!("  Log: {}", log);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting harvest from {} to {}",
        config.harvest.start_date,
        config.harvest.end_date
    );

    match run_harvest(config).await {
        Ok(stats) => {
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
