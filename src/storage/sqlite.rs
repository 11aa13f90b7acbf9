//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::record::Record;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageResult};
use crate::storage::StoredArticle;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Gets a stored article by id
    pub fn get_article(&self, id: &str) -> StorageResult<Option<StoredArticle>> {
        let article = self
            .conn
            .query_row(
                "SELECT id, partition_key, published_at, web_url, title, section_id, section_name, body, saved_at
                 FROM articles WHERE id = ?1",
                params![id],
                |row| {
                    Ok(StoredArticle {
                        id: row.get(0)?,
                        partition_key: row.get(1)?,
                        published_at: row.get(2)?,
                        web_url: row.get(3)?,
                        title: row.get(4)?,
                        section_id: row.get(5)?,
                        section_name: row.get(6)?,
                        body: row.get(7)?,
                        saved_at: row.get(8)?,
                    })
                },
            )
            .optional()?;

        Ok(article)
    }

    /// Counts the articles stored under one partition
    pub fn count_partition(&self, partition_key: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE partition_key = ?1",
            params![partition_key],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl ArticleStore for SqliteStore {
    fn save(&mut self, record: &Record) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO articles
                (id, partition_key, published_at, web_url, title, section_id, section_name, body, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                partition_key = excluded.partition_key,
                published_at = excluded.published_at,
                web_url = excluded.web_url,
                title = excluded.title,
                section_id = excluded.section_id,
                section_name = excluded.section_name,
                body = excluded.body,
                saved_at = excluded.saved_at",
            params![
                record.id,
                record.partition_key.to_string(),
                record.published_at.to_rfc3339(),
                record.source_url,
                record.title,
                record.section_id,
                record.section_name,
                record.body,
                now
            ],
        )?;
        Ok(())
    }

    fn location(&self, record: &Record) -> String {
        format!("articles[{}]", record.id)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
