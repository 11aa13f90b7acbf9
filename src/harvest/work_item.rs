//! Work item: one day of paginated fetch-and-persist
//!
//! A work item walks every result page of its day, then hands the collected
//! records to storage. Any failed page request ends the attempt; the whole
//! day is fetched again from page 1 on the next attempt.

use crate::harvest::fetcher::PageFetcher;
use crate::record::Record;
use crate::state::{RequestPacer, WorkItemState};
use crate::storage::ArticleStore;
use crate::RequestError;
use chrono::NaiveDate;

/// Default number of failed attempts before a day is abandoned
pub const DEFAULT_TRIES_THRESHOLD: u32 = 3;

/// Result of one processing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Every page fetched; records handed to storage
    Succeeded {
        /// Records written
        saved: usize,
        /// Records whose write failed (logged, not retried)
        failed: usize,
        /// Entries skipped by the fetcher
        skipped: usize,
    },

    /// A request failed with retry budget left; requeue the item
    Retry { attempt: u32 },

    /// A request failed and the retry budget is spent; drop the item
    Abandoned { attempts: u32 },
}

impl ProcessOutcome {
    /// Returns true when the item must be removed from the queue
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Retry { .. })
    }
}

/// A single day's unit of retryable work
#[derive(Debug, Clone)]
pub struct WorkItem {
    partition_key: NaiveDate,
    attempt_count: u32,
    tries_threshold: u32,
    state: WorkItemState,
    records: Vec<Record>,
}

impl WorkItem {
    /// Creates a pending item for `partition_key`
    pub fn new(partition_key: NaiveDate, tries_threshold: u32) -> Self {
        Self {
            partition_key,
            attempt_count: 0,
            tries_threshold,
            state: WorkItemState::Pending,
            records: Vec::new(),
        }
    }

    /// Day this item harvests
    pub fn partition_key(&self) -> NaiveDate {
        self.partition_key
    }

    /// Failed attempts so far
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Failed attempts allowed before abandonment
    pub fn tries_threshold(&self) -> u32 {
        self.tries_threshold
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkItemState {
        self.state
    }

    /// Records accumulated by the latest attempt
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Runs one attempt: fetch every page, then persist
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of result pages
    /// * `store` - Destination for harvested records
    /// * `pacer` - Request pacing shared across the whole run
    ///
    /// # Returns
    ///
    /// The attempt's outcome; [`ProcessOutcome::is_terminal`] tells the
    /// caller whether to requeue the item.
    pub async fn process<F, S>(
        &mut self,
        fetcher: &F,
        store: &mut S,
        pacer: &mut RequestPacer,
    ) -> ProcessOutcome
    where
        F: PageFetcher + ?Sized,
        S: ArticleStore + ?Sized,
    {
        self.transition(WorkItemState::InProgress);
        self.records.clear();

        match self.fetch_all_pages(fetcher, pacer).await {
            Ok(skipped) => {
                let (saved, failed) = self.persist(store);
                self.transition(WorkItemState::Succeeded);
                ProcessOutcome::Succeeded {
                    saved,
                    failed,
                    skipped,
                }
            }
            Err(e) => {
                // Partial pages from a failed attempt are never persisted
                self.records.clear();
                self.attempt_count += 1;
                tracing::debug!(
                    "Incrementing retry count to: [{}] for work item with date: [{}] after: {}",
                    self.attempt_count,
                    self.partition_key,
                    e
                );

                if self.attempt_count < self.tries_threshold {
                    self.transition(WorkItemState::Pending);
                    ProcessOutcome::Retry {
                        attempt: self.attempt_count,
                    }
                } else {
                    tracing::error!(
                        "Reached maximum number of tries for work item with date: [{}]",
                        self.partition_key
                    );
                    self.transition(WorkItemState::Abandoned);
                    ProcessOutcome::Abandoned {
                        attempts: self.attempt_count,
                    }
                }
            }
        }
    }

    /// Fetches pages 1..=N into the accumulator, returning skipped entries
    async fn fetch_all_pages<F>(
        &mut self,
        fetcher: &F,
        pacer: &mut RequestPacer,
    ) -> Result<usize, RequestError>
    where
        F: PageFetcher + ?Sized,
    {
        let mut page = 1;
        let mut skipped = 0;

        loop {
            pacer.wait_turn().await;
            let fetched = fetcher.fetch(self.partition_key, page).await?;

            skipped += fetched.skipped;
            self.records.extend(fetched.records);

            if !fetched.has_more_pages {
                return Ok(skipped);
            }
            page += 1;
        }
    }

    /// Writes every accumulated record, returning (saved, failed)
    fn persist<S>(&self, store: &mut S) -> (usize, usize)
    where
        S: ArticleStore + ?Sized,
    {
        let mut saved = 0;
        let mut failed = 0;

        for record in &self.records {
            match store.save(record) {
                Ok(()) => {
                    saved += 1;
                    tracing::info!(
                        "Saving to disk hit with id: [{}] from work item with date: [{}]",
                        record.id,
                        self.partition_key
                    );
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        "Couldn't save hit to [{}] from work item with date: [{}]: {}",
                        store.location(record),
                        self.partition_key,
                        e
                    );
                }
            }
        }

        (saved, failed)
    }

    fn transition(&mut self, next: WorkItemState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid work item transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!(
            "Work item [{}]: {} -> {}",
            self.partition_key,
            self.state,
            next
        );
        self.state = next;
    }
}
