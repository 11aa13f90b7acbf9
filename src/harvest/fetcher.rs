//! Page fetcher for the content search API
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with a proper user agent string and timeouts
//! - Issuing one search request per (day, page)
//! - Classifying responses into data, empty pages and transient failures
//! - Filtering result entries by content type

use crate::config::{ApiConfig, UserAgentConfig};
use crate::record::{Record, ResultEntry};
use crate::RequestError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// One successfully fetched page of results
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Whether a later page exists for the same day
    pub has_more_pages: bool,

    /// Total page count reported by the API
    pub total_pages: u32,

    /// Entries of the desired content type, in API order
    pub records: Vec<Record>,

    /// Entries that were skipped (other content types or unusable entries)
    pub skipped: usize,
}

/// Source of result pages for a single day
///
/// `page` starts at 1. A returned error is always treated as transient by
/// the caller; attempt bookkeeping is not the fetcher's concern.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, partition: NaiveDate, page: u32) -> Result<FetchedPage, RequestError>;
}

/// Top-level JSON envelope returned by the search endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    response: ApiResponse,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    pages: u32,

    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Upper bound for a whole request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+mailto:ContactEmail)
    let user_agent = format!(
        "{}/{} (+mailto:{})",
        user_agent.name, user_agent.version, user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by the Guardian content API
pub struct GuardianFetcher {
    client: Client,
    api: ApiConfig,
    search_url: String,
}

impl GuardianFetcher {
    /// Creates a fetcher issuing requests through `client`
    pub fn new(client: Client, api: ApiConfig) -> Self {
        let search_url = format!("{}/search", api.base_url.trim_end_matches('/'));
        Self {
            client,
            api,
            search_url,
        }
    }

    /// Builds a fetcher with its own client from the configuration
    pub fn from_config(api: &ApiConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, Duration::from_secs(api.timeout_secs))?;
        Ok(Self::new(client, api.clone()))
    }

    /// Query parameters for one page of one day
    ///
    /// Both ends of the date filter are the same day, so a partition is
    /// exactly one day wide.
    pub fn query(&self, partition: NaiveDate, page: u32) -> Vec<(&'static str, String)> {
        let day = partition.to_string();
        vec![
            ("api-key", self.api.api_key.clone()),
            ("section", self.api.section.clone()),
            ("tag", self.api.tag.clone()),
            ("show-fields", self.api.show_fields.clone()),
            ("page-size", self.api.page_size.to_string()),
            ("order-by", self.api.order_by.clone()),
            ("page", page.to_string()),
            ("lang", self.api.lang.clone()),
            ("from-date", day.clone()),
            ("to-date", day),
        ]
    }
}

#[async_trait]
impl PageFetcher for GuardianFetcher {
    async fn fetch(&self, partition: NaiveDate, page: u32) -> Result<FetchedPage, RequestError> {
        tracing::info!(
            "Sending HTTP request for work item with date: [{}], page: [{}]",
            partition,
            page
        );

        let transport = |source: reqwest::Error| {
            tracing::warn!(
                "HTTP request failed for work item with date: [{}]: {}",
                partition,
                source
            );
            RequestError::Transport {
                partition: partition.to_string(),
                source,
            }
        };

        let response = self
            .client
            .get(&self.search_url)
            .query(&self.query(partition, page))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            tracing::warn!(
                "HTTP response failed. Status code: [{}] for work item with date: [{}]. Entire response: [{}]",
                status.as_u16(),
                partition,
                body
            );
            return Err(RequestError::HttpStatus {
                partition: partition.to_string(),
                status: status.as_u16(),
            });
        }

        parse_page(&body, partition, page, &self.api.content_type)
    }
}

/// Classifies a 2xx response body into a fetched page or a failure
///
/// # Arguments
///
/// * `body` - Raw JSON payload
/// * `partition` - Day the page was requested for
/// * `page` - Page index that was requested
/// * `content_type` - Result type converted to records
///
/// # Returns
///
/// * `Ok(FetchedPage)` - Payload status was "ok"
/// * `Err(RequestError)` - Payload status was anything else, or unreadable
pub fn parse_page(
    body: &str,
    partition: NaiveDate,
    page: u32,
    content_type: &str,
) -> Result<FetchedPage, RequestError> {
    let envelope: ApiEnvelope = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(
            "Unreadable API payload for work item with date: [{}]: {}",
            partition,
            e
        );
        RequestError::Decode {
            partition: partition.to_string(),
            message: e.to_string(),
        }
    })?;
    let response = envelope.response;

    if response.status != "ok" {
        tracing::warn!(
            "API response failed. Response status: [{}] for work item with date: [{}]. Entire json: [{}]",
            response.status,
            partition,
            body
        );
        return Err(RequestError::ApiStatus {
            partition: partition.to_string(),
            status: response.status,
            message: response.message.unwrap_or_default(),
        });
    }

    let mut fetched = FetchedPage {
        has_more_pages: page < response.pages,
        total_pages: response.pages,
        records: Vec::with_capacity(response.results.len()),
        skipped: 0,
    };

    for value in response.results {
        let kind = value.get("type").and_then(|t| t.as_str()).unwrap_or("");
        let id = value.get("id").and_then(|i| i.as_str()).unwrap_or("");

        if kind != content_type {
            tracing::debug!(
                "Skipping hit with id: [{}] since it is of undesired type: [{}] from work item with date: [{}]",
                id,
                kind,
                partition
            );
            fetched.skipped += 1;
            continue;
        }

        let record = serde_json::from_value::<ResultEntry>(value.clone())
            .ok()
            .and_then(|entry| Record::from_entry(entry, partition));
        match record {
            Some(record) => fetched.records.push(record),
            None => {
                tracing::warn!(
                    "Skipping unusable hit with id: [{}] from work item with date: [{}]",
                    id,
                    partition
                );
                fetched.skipped += 1;
            }
        }
    }

    Ok(fetched)
}
