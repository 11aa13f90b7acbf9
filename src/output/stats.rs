//! Run statistics
//!
//! This module collects per-run counters from work item outcomes and prints
//! them at the end of a harvest.

use crate::harvest::ProcessOutcome;
use chrono::NaiveDate;
use std::time::Duration;

/// Harvest run statistics
#[derive(Debug, Clone, Default)]
pub struct HarvestStats {
    /// Work items generated for the run
    pub work_items: usize,

    /// Items that fetched every page and persisted their records
    pub succeeded: usize,

    /// Items dropped after exhausting their retry budget
    pub abandoned: usize,

    /// Failed attempts that led to a requeue
    pub retries: usize,

    /// API requests sent
    pub requests: u32,

    /// Upstream daily quota the request count is compared against
    pub daily_request_quota: u32,

    /// Records written to storage
    pub records_saved: usize,

    /// Records whose write failed
    pub save_failures: usize,

    /// Result entries skipped by content type
    pub skipped_entries: usize,

    /// Days for which nothing was persisted
    pub abandoned_partitions: Vec<NaiveDate>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl HarvestStats {
    /// Folds one attempt's outcome into the counters
    pub fn record_outcome(&mut self, partition: NaiveDate, outcome: &ProcessOutcome) {
        match *outcome {
            ProcessOutcome::Succeeded {
                saved,
                failed,
                skipped,
            } => {
                self.succeeded += 1;
                self.records_saved += saved;
                self.save_failures += failed;
                self.skipped_entries += skipped;
            }
            ProcessOutcome::Retry { .. } => {
                self.retries += 1;
            }
            ProcessOutcome::Abandoned { .. } => {
                self.abandoned += 1;
                self.abandoned_partitions.push(partition);
            }
        }
    }

    /// Percentage of work items that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.work_items == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.work_items as f64) * 100.0
    }

    /// Whether the run sent more requests than the daily quota
    pub fn exceeded_quota(&self) -> bool {
        self.requests > self.daily_request_quota
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStats) {
    println!("=== Harvest Statistics ===\n");

    println!("Work Items:");
    println!("  Generated: {}", stats.work_items);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Abandoned: {}", stats.abandoned);
    println!("  Retries: {}", stats.retries);
    println!();

    println!("Records:");
    println!("  Saved: {}", stats.records_saved);
    println!("  Failed writes: {}", stats.save_failures);
    println!("  Skipped entries: {}", stats.skipped_entries);
    println!();

    println!(
        "Requests: {} (daily quota {}{})",
        stats.requests,
        stats.daily_request_quota,
        if stats.exceeded_quota() {
            ", exceeded"
        } else {
            ""
        }
    );
    println!("Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    if !stats.abandoned_partitions.is_empty() {
        println!("Abandoned Days ({}):", stats.abandoned_partitions.len());
        for day in &stats.abandoned_partitions {
            println!("  - {}", day);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} days harvested)",
        stats.success_rate(),
        stats.succeeded,
        stats.work_items
    );
}
