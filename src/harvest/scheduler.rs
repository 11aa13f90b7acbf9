//! Scheduler for driving the per-day work queue
//!
//! This module handles:
//! - Generating one work item per calendar day of a range
//! - FIFO processing with requeue-at-tail for retryable failures
//! - Dropping items once they reach a terminal outcome
//! - Collecting run statistics

use crate::harvest::fetcher::PageFetcher;
use crate::harvest::work_item::{ProcessOutcome, WorkItem};
use crate::output::HarvestStats;
use crate::state::RequestPacer;
use crate::storage::ArticleStore;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::time::Instant;

/// FIFO queue of pending work items
///
/// Items are taken from the head; a requeued item goes to the tail, so it
/// waits for every other pending item before its next attempt.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<WorkItem>,
}

impl WorkQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item at the tail
    pub fn push_tail(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    /// Removes and returns the head item
    pub fn pop_head(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    /// Returns the number of queued items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over queued items from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &WorkItem> {
        self.items.iter()
    }
}

/// Generates one pending work item per day of `[start, end]`
///
/// Items are queued in ascending date order. An inverted range yields an
/// empty queue.
pub fn generate_work_items(start: NaiveDate, end: NaiveDate, tries_threshold: u32) -> WorkQueue {
    let mut queue = WorkQueue::new();
    for day in start.iter_days().take_while(|day| *day <= end) {
        queue.push_tail(WorkItem::new(day, tries_threshold));
    }
    queue
}

/// Scheduler owns the queue for the duration of a run
///
/// Items are processed strictly one at a time; the scheduler never looks at
/// why an item failed, only at whether its outcome is terminal.
pub struct Scheduler<F, S> {
    fetcher: F,
    store: S,
    pacer: RequestPacer,
    tries_threshold: u32,
}

impl<F, S> Scheduler<F, S>
where
    F: PageFetcher,
    S: ArticleStore,
{
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of result pages
    /// * `store` - Destination for harvested records
    /// * `pacer` - Request pacing for the whole run
    /// * `tries_threshold` - Failed attempts allowed per day
    pub fn new(fetcher: F, store: S, pacer: RequestPacer, tries_threshold: u32) -> Self {
        Self {
            fetcher,
            store,
            pacer,
            tries_threshold,
        }
    }

    /// Harvests every day of `[start, end]` and drains the queue
    ///
    /// Never fails: request failures are retried or abandoned per item and
    /// storage failures are logged by the item.
    pub async fn run(&mut self, start: NaiveDate, end: NaiveDate) -> HarvestStats {
        let queue = generate_work_items(start, end, self.tries_threshold);
        tracing::info!(
            "Generated {} work items from {} to {}",
            queue.len(),
            start,
            end
        );
        self.run_queue(queue).await
    }

    /// Drives an already-built queue until it is empty
    pub async fn run_queue(&mut self, mut queue: WorkQueue) -> HarvestStats {
        let start_time = Instant::now();
        let requests_before = self.pacer.request_count;
        let mut stats = HarvestStats {
            work_items: queue.len(),
            daily_request_quota: self.pacer.daily_quota,
            ..HarvestStats::default()
        };

        while let Some(mut item) = queue.pop_head() {
            tracing::debug!(
                "Processing work item with date: [{}] (attempt {})",
                item.partition_key(),
                item.attempt_count() + 1
            );

            let outcome = item
                .process(&self.fetcher, &mut self.store, &mut self.pacer)
                .await;
            stats.record_outcome(item.partition_key(), &outcome);

            match outcome {
                ProcessOutcome::Retry { attempt } => {
                    tracing::info!(
                        "Requeueing work item with date: [{}] after failed attempt {}/{}",
                        item.partition_key(),
                        attempt,
                        item.tries_threshold()
                    );
                    queue.push_tail(item);
                }
                _ => {
                    let finished = stats.succeeded + stats.abandoned;
                    if finished % 10 == 0 {
                        tracing::info!(
                            "Progress: {}/{} days finished, {} in queue, {} requests sent",
                            finished,
                            stats.work_items,
                            queue.len(),
                            self.pacer.request_count - requests_before
                        );
                    }
                }
            }
        }

        stats.requests = self.pacer.request_count - requests_before;
        stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Harvest complete: {} succeeded, {} abandoned, {} records saved in {:?}",
            stats.succeeded,
            stats.abandoned,
            stats.records_saved,
            stats.elapsed
        );

        stats
    }

    /// Returns the article store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the request pacer
    pub fn pacer(&self) -> &RequestPacer {
        &self.pacer
    }
}
