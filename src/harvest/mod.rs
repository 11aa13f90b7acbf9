//! Harvest module: the work-item lifecycle engine
//!
//! This module contains the core harvesting logic, including:
//! - Page fetching with response classification
//! - Per-day work items with pagination and a retry budget
//! - The FIFO scheduler that requeues failed days behind the rest
//! - Overall run wiring from configuration

mod fetcher;
mod scheduler;
mod work_item;

pub use fetcher::{build_http_client, parse_page, FetchedPage, GuardianFetcher, PageFetcher};
pub use scheduler::{generate_work_items, Scheduler, WorkQueue};
pub use work_item::{ProcessOutcome, WorkItem, DEFAULT_TRIES_THRESHOLD};

use crate::config::Config;
use crate::output::{generate_markdown_summary, HarvestStats};
use crate::state::RequestPacer;
use crate::storage::open_store;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete harvest operation
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the HTTP client and fetcher
/// 2. Open the configured article store
/// 3. Generate one work item per day of the configured range
/// 4. Drain the queue
/// 5. Write the markdown summary, if configured
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(HarvestStats)` - The run finished (possibly with abandoned days)
/// * `Err(HarvestError)` - Setup or summary output failed
pub async fn run_harvest(config: &Config) -> Result<HarvestStats, HarvestError> {
    let fetcher = GuardianFetcher::from_config(&config.api, &config.user_agent)?;
    let store = open_store(&config.output)?;
    let pacer = RequestPacer::from_config(&config.harvest);

    let mut scheduler = Scheduler::new(fetcher, store, pacer, config.harvest.tries_threshold);
    let stats = scheduler
        .run(config.harvest.start_date, config.harvest.end_date)
        .await;

    if let Some(summary_path) = &config.output.summary_path {
        generate_markdown_summary(&stats, config, Path::new(summary_path))?;
        tracing::info!("Summary written to {}", summary_path);
    }

    Ok(stats)
}
