//! File-per-article storage
//!
//! Articles land at `<root>/<YYYY-MM-DD>/<id with '/' replaced>.txt`, each
//! file holding the record's flat JSON document.

use crate::record::Record;
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of persisted article files
const ARTICLE_EXTENSION: &str = "txt";

/// Directory-tree storage backend
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`
    ///
    /// Directories are created lazily on the first save into them.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every article of one partition
    pub fn partition_dir(&self, record: &Record) -> PathBuf {
        self.root.join(record.partition_key.to_string())
    }

    /// Full path of a record's artifact
    pub fn path_for(&self, record: &Record) -> PathBuf {
        self.partition_dir(record)
            .join(format!("{}.{}", record.storage_key(), ARTICLE_EXTENSION))
    }
}

impl ArticleStore for FileStore {
    fn save(&mut self, record: &Record) -> StorageResult<()> {
        let directory = self.partition_dir(record);
        if !directory.is_dir() {
            tracing::debug!("Creating directory: [{}]", directory.display());
            fs::create_dir_all(&directory).map_err(|source| StorageError::Write {
                id: record.id.clone(),
                source,
            })?;
        }

        let document = record.to_document()?;
        fs::write(self.path_for(record), document).map_err(|source| StorageError::Write {
            id: record.id.clone(),
            source,
        })?;

        Ok(())
    }

    fn location(&self, record: &Record) -> String {
        self.path_for(record).display().to_string()
    }

    fn count_articles(&self) -> StorageResult<u64> {
        if !self.root.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for partition in fs::read_dir(&self.root)? {
            let partition = partition?;
            if !partition.file_type()?.is_dir() {
                continue;
            }
            for entry in fs::read_dir(partition.path())? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) == Some(ARTICLE_EXTENSION) {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}
