use chrono::NaiveDate;
use serde::Deserialize;

/// Main configuration structure for Guardian Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub harvest: HarvestConfig,
    pub api: ApiConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Work-queue behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// First day to harvest (inclusive), e.g. "2018-01-01"
    #[serde(rename = "start-date")]
    pub start_date: NaiveDate,

    /// Last day to harvest (inclusive)
    #[serde(rename = "end-date")]
    pub end_date: NaiveDate,

    /// Failed attempts allowed before a day is abandoned
    #[serde(rename = "tries-threshold", default = "default_tries_threshold")]
    pub tries_threshold: u32,

    /// Minimum time between two consecutive API requests (milliseconds)
    #[serde(
        rename = "min-request-interval-ms",
        default = "default_min_request_interval_ms"
    )]
    pub min_request_interval_ms: u64,

    /// Upstream daily request quota, reported but not enforced
    #[serde(
        rename = "daily-request-quota",
        default = "default_daily_request_quota"
    )]
    pub daily_request_quota: u32,
}

/// Remote content API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the content API (the `/search` path is appended)
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// API key sent with every request
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Section filter
    #[serde(default = "default_section")]
    pub section: String,

    /// Tag filter expression
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Additional fields to include in each result
    #[serde(rename = "show-fields", default = "default_show_fields")]
    pub show_fields: String,

    /// Results per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Result ordering
    #[serde(rename = "order-by", default = "default_order_by")]
    pub order_by: String,

    /// Content language
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Result type kept as a record; everything else is skipped
    #[serde(rename = "content-type", default = "default_content_type")]
    pub content_type: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    pub name: String,

    /// Version of the harvester
    pub version: String,

    /// Email address for operator contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for per-day article directories
    #[serde(rename = "root-dir")]
    pub root_dir: String,

    /// Storage backend for articles
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Append-mode log file; logs go to stderr when unset
    #[serde(rename = "log-path", default)]
    pub log_path: Option<String>,

    /// Markdown run summary written at the end of a run
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

/// Where harvested articles are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per article under `root-dir/<day>/`
    #[default]
    Files,

    /// One row per article in an SQLite database
    Sqlite,
}

fn default_tries_threshold() -> u32 {
    crate::harvest::DEFAULT_TRIES_THRESHOLD
}

fn default_min_request_interval_ms() -> u64 {
    100
}

fn default_daily_request_quota() -> u32 {
    5000
}

fn default_base_url() -> String {
    "https://content.guardianapis.com".to_string()
}

fn default_section() -> String {
    "-commentisfree".to_string()
}

fn default_tag() -> String {
    "(us-news/us-politics) | (politics/politics)".to_string()
}

fn default_show_fields() -> String {
    "body".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_order_by() -> String {
    "oldest".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_content_type() -> String {
    "article".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
