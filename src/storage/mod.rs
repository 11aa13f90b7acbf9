//! Storage module for persisting harvested articles
//!
//! This module handles writing articles to durable storage:
//! - One JSON document per article in a per-day directory tree
//! - Alternatively one row per article in an SQLite database
//!
//! Both backends overwrite by article id, so retried days never produce
//! duplicate artifacts.

mod files;
mod schema;
mod sqlite;
mod traits;

pub use files::FileStore;
pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StorageError, StorageResult};

use crate::config::{OutputConfig, StorageBackend};
use std::path::Path;

/// Opens the article store selected by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
///
/// # Returns
///
/// * `Ok(Box<dyn ArticleStore>)` - The opened backend
/// * `Err(StorageError)` - Failed to open the backend
pub fn open_store(config: &OutputConfig) -> StorageResult<Box<dyn ArticleStore>> {
    match config.backend {
        StorageBackend::Files => Ok(Box::new(FileStore::new(&config.root_dir))),
        StorageBackend::Sqlite => {
            let path = config
                .database_path
                .as_deref()
                .unwrap_or("articles.db");
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(Box::new(SqliteStore::new(Path::new(path))?))
        }
    }
}

/// Represents an article row in the database
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub id: String,
    pub partition_key: String,
    pub published_at: String,
    pub web_url: String,
    pub title: String,
    pub section_id: String,
    pub section_name: String,
    pub body: String,
    pub saved_at: String,
}
