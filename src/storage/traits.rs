//! Storage traits and error types
//!
//! This module defines the trait interface for article storage backends and
//! associated error types.

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Couldn't write article {id}: {source}")]
    Write {
        id: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for article storage backends
///
/// Saves are keyed by the record's identity and overwrite any previous
/// artifact for the same id, so saving the same record again is harmless.
pub trait ArticleStore {
    /// Persists one record, replacing an earlier copy with the same id
    fn save(&mut self, record: &Record) -> StorageResult<()>;

    /// Human-readable location of a record's artifact, for logging
    fn location(&self, record: &Record) -> String;

    /// Counts the distinct articles currently stored
    fn count_articles(&self) -> StorageResult<u64>;
}

impl<S: ArticleStore + ?Sized> ArticleStore for Box<S> {
    fn save(&mut self, record: &Record) -> StorageResult<()> {
        (**self).save(record)
    }

    fn location(&self, record: &Record) -> String {
        (**self).location(record)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        (**self).count_articles()
    }
}
