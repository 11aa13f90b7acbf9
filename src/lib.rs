//! Guardian Harvest: a bounded-retry article collector
//!
//! This crate harvests day-partitioned pages of articles from The Guardian
//! content API and persists each article as an individual artifact. One work
//! item is generated per calendar day; failed days are requeued behind the
//! rest of the queue and abandoned once their retry budget is spent.

pub mod config;
pub mod harvest;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for setup-level failures
///
/// Once a harvest run has started nothing is escalated through this type:
/// request failures are retried and storage failures are logged.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transient failure of a single page request
///
/// Every variant is recovered locally by the work item's retry budget.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("HTTP status {status} for {partition}")]
    HttpStatus { partition: String, status: u16 },

    #[error("API status '{status}' for {partition}: {message}")]
    ApiStatus {
        partition: String,
        status: String,
        message: String,
    },

    #[error("Transport error for {partition}: {source}")]
    Transport {
        partition: String,
        source: reqwest::Error,
    },

    #[error("Malformed payload for {partition}: {message}")]
    Decode { partition: String, message: String },
}

/// Result type alias for harvest setup operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{ProcessOutcome, Scheduler, WorkItem};
pub use record::Record;
pub use state::WorkItemState;
