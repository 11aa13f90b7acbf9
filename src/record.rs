//! Harvested article records
//!
//! A [`Record`] is built once from an API result entry of the desired content
//! type and is immutable afterwards. Its `id` is the durable identity used as
//! the persistence key.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the content API's `results` array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub id: String,

    /// Type discriminator ("article", "liveblog", "gallery", ...)
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub web_url: String,

    #[serde(default)]
    pub web_title: String,

    #[serde(default)]
    pub section_id: String,

    #[serde(default)]
    pub section_name: String,

    pub web_publication_date: DateTime<Utc>,

    #[serde(default)]
    pub fields: EntryFields,
}

/// Nested `fields` object requested through `show-fields`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFields {
    #[serde(default)]
    pub body: String,
}

/// A single harvested article
///
/// Serializes to the flat key-value document that is persisted; the
/// partition key only decides placement and is not part of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "webPublicationDate")]
    pub published_at: DateTime<Utc>,

    pub id: String,

    #[serde(rename = "webUrl")]
    pub source_url: String,

    #[serde(rename = "webTitle")]
    pub title: String,

    #[serde(rename = "sectionId")]
    pub section_id: String,

    #[serde(rename = "sectionName")]
    pub section_name: String,

    pub body: String,

    #[serde(skip)]
    pub partition_key: NaiveDate,
}

impl Record {
    /// Builds a record from a result entry fetched under `partition_key`
    ///
    /// Returns None when the entry has no identity to persist it under.
    pub fn from_entry(entry: ResultEntry, partition_key: NaiveDate) -> Option<Self> {
        if entry.id.trim().is_empty() {
            return None;
        }

        Some(Self {
            published_at: entry.web_publication_date,
            id: entry.id,
            source_url: entry.web_url,
            title: entry.web_title,
            section_id: entry.section_id,
            section_name: entry.section_name,
            body: entry.fields.body,
            partition_key,
        })
    }

    /// Filesystem-safe form of the identity
    pub fn storage_key(&self) -> String {
        self.id.replace('/', "_")
    }

    /// Serializes the record as its persisted JSON document
    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.partition_key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_record(id: &str, day: NaiveDate) -> Record {
        Record {
            published_at: day.and_hms_opt(9, 30, 0).unwrap().and_utc(),
            id: id.to_string(),
            source_url: format!("https://www.theguardian.com/{}", id),
            title: format!("Title of {}", id),
            section_id: "politics".to_string(),
            section_name: "Politics".to_string(),
            body: "<p>Body</p>".to_string(),
            partition_key: day,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    #[test]
    fn test_from_entry() {
        let entry: ResultEntry = serde_json::from_str(
            r#"{
                "id": "politics/2018/jan/01/brexit",
                "type": "article",
                "webUrl": "https://www.theguardian.com/politics/2018/jan/01/brexit",
                "webTitle": "Brexit",
                "sectionId": "politics",
                "sectionName": "Politics",
                "webPublicationDate": "2018-01-01T10:00:00Z",
                "fields": {"body": "<p>text</p>"}
            }"#,
        )
        .unwrap();

        let record = Record::from_entry(entry, day()).unwrap();
        assert_eq!(record.id, "politics/2018/jan/01/brexit");
        assert_eq!(record.section_name, "Politics");
        assert_eq!(record.body, "<p>text</p>");
        assert_eq!(record.partition_key, day());
    }

    #[test]
    fn test_from_entry_rejects_empty_id() {
        let entry: ResultEntry = serde_json::from_str(
            r#"{"id": "", "type": "article", "webPublicationDate": "2018-01-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert!(Record::from_entry(entry, day()).is_none());
    }

    #[test]
    fn test_missing_body_defaults_to_empty() {
        let entry: ResultEntry = serde_json::from_str(
            r#"{"id": "a/b", "type": "article", "webPublicationDate": "2018-01-01T10:00:00Z"}"#,
        )
        .unwrap();

        let record = Record::from_entry(entry, day()).unwrap();
        assert!(record.body.is_empty());
    }

    #[test]
    fn test_storage_key_replaces_slashes() {
        let record = sample_record("us-news/2018/jan/01/story", day());
        assert_eq!(record.storage_key(), "us-news_2018_jan_01_story");
    }

    #[test]
    fn test_document_is_flat_and_omits_partition() {
        let record = sample_record("politics/2018/jan/01/story", day());
        let doc: serde_json::Value =
            serde_json::from_str(&record.to_document().unwrap()).unwrap();

        let object = doc.as_object().unwrap();
        assert_eq!(object.len(), 7);
        assert_eq!(object["id"], "politics/2018/jan/01/story");
        assert_eq!(object["webTitle"], "Title of politics/2018/jan/01/story");
        assert_eq!(object["sectionId"], "politics");
        assert_eq!(object["webPublicationDate"], "2018-01-01T09:30:00Z");
        assert!(!object.contains_key("partition_key"));
    }
}
