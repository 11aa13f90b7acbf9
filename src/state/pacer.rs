use crate::config::HarvestConfig;
use std::time::{Duration, Instant};

/// Paces requests to the content API
///
/// Every request goes through [`RequestPacer::wait_turn`], which holds the
/// caller back until the minimum interval since the previous request has
/// elapsed. The daily quota is only tracked: crossing it logs a warning once
/// and nothing is blocked.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    /// Minimum time between two consecutive requests
    pub min_interval: Duration,

    /// Upstream daily request quota
    pub daily_quota: u32,

    /// Number of requests sent in this run
    pub request_count: u32,

    /// Timestamp of the last request
    pub last_request_time: Option<Instant>,

    quota_warned: bool,
}

impl RequestPacer {
    /// Creates a pacer with the given interval and quota
    pub fn new(min_interval: Duration, daily_quota: u32) -> Self {
        Self {
            min_interval,
            daily_quota,
            request_count: 0,
            last_request_time: None,
            quota_warned: false,
        }
    }

    /// Creates a pacer from the harvest configuration
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_request_interval_ms),
            config.daily_request_quota,
        )
    }

    /// Checks if a request can be sent at `now`
    pub fn can_request(&self, now: Instant) -> bool {
        self.time_until_next_request(now).is_none()
    }

    /// Calculates the time until the next request can be sent
    ///
    /// Returns None if a request can be sent now.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was sent at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);

        if self.has_exceeded_quota() && !self.quota_warned {
            self.quota_warned = true;
            tracing::warn!(
                "Request count {} exceeded the daily quota of {}",
                self.request_count,
                self.daily_quota
            );
        }
    }

    /// Sleeps until a request is allowed, then records it
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Pacing next request by {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }

    /// Checks if more requests were sent than the daily quota allows
    pub fn has_exceeded_quota(&self) -> bool {
        self.request_count > self.daily_quota
    }

    /// Returns the number of requests remaining under the daily quota
    pub fn requests_remaining(&self) -> u32 {
        self.daily_quota.saturating_sub(self.request_count)
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 5000)
    }
}
