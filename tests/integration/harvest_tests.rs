//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the content API and drive the
//! real fetcher, scheduler and file store end-to-end.

use chrono::NaiveDate;
use guardian_harvest::config::{
    ApiConfig, Config, HarvestConfig, OutputConfig, StorageBackend, UserAgentConfig,
};
use guardian_harvest::harvest::{build_http_client, run_harvest, GuardianFetcher, Scheduler};
use guardian_harvest::state::RequestPacer;
use guardian_harvest::storage::{ArticleStore, FileStore};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
}

fn create_test_api(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        section: "-commentisfree".to_string(),
        tag: "(us-news/us-politics) | (politics/politics)".to_string(),
        show_fields: "body".to_string(),
        page_size: 50,
        order_by: "oldest".to_string(),
        lang: "en".to_string(),
        content_type: "article".to_string(),
        timeout_secs: 5,
    }
}

fn create_test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        name: "TestHarvester".to_string(),
        version: "1.0.0".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn create_scheduler(base_url: &str, root: &Path) -> Scheduler<GuardianFetcher, FileStore> {
    let client = build_http_client(&create_test_user_agent(), Duration::from_secs(5))
        .expect("Failed to build client");
    Scheduler::new(
        GuardianFetcher::new(client, create_test_api(base_url)),
        FileStore::new(root),
        RequestPacer::new(Duration::from_millis(1), 5000),
        3,
    )
}

fn entry(id: &str, kind: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": kind,
        "webUrl": format!("https://www.theguardian.com/{}", id),
        "webTitle": format!("Title {}", id),
        "sectionId": "politics",
        "sectionName": "Politics",
        "webPublicationDate": "2018-01-01T12:00:00Z",
        "fields": { "body": format!("<p>{}</p>", id) }
    })
}

fn ok_page(pages: u32, results: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "response": {
            "status": "ok",
            "pages": pages,
            "results": results
        }
    }))
}

#[tokio::test]
async fn test_single_day_with_two_articles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("from-date", "2018-01-01"))
        .and(query_param("to-date", "2018-01-01"))
        .and(query_param("page", "1"))
        .and(query_param("api-key", "test-key"))
        .respond_with(ok_page(
            1,
            vec![
                entry("politics/2018/jan/01/one", "article"),
                entry("politics/2018/jan/01/two", "article"),
                entry("politics/live/2018/jan/01/blog", "liveblog"),
            ],
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut scheduler = create_scheduler(&mock_server.uri(), dir.path());

    let stats = scheduler.run(day(1), day(1)).await;

    assert_eq!(stats.work_items, 1);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.records_saved, 2);
    assert_eq!(stats.skipped_entries, 1);
    assert_eq!(stats.requests, 1);

    let saved = dir.path().join("2018-01-01/politics_2018_jan_01_one.txt");
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
    assert_eq!(doc["id"], "politics/2018/jan/01/one");
    assert_eq!(doc["body"], "<p>politics/2018/jan/01/one</p>");
    assert_eq!(scheduler.store().count_articles().unwrap(), 2);
}

#[tokio::test]
async fn test_paginates_through_all_pages() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        let id = format!("politics/2018/jan/02/page-{}", page);
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("page", page.to_string()))
            .respond_with(ok_page(3, vec![entry(&id, "article")]))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut scheduler = create_scheduler(&mock_server.uri(), dir.path());

    let stats = scheduler.run(day(2), day(2)).await;

    assert_eq!(stats.requests, 3);
    assert_eq!(stats.records_saved, 3);
    assert_eq!(scheduler.store().count_articles().unwrap(), 3);
}

#[tokio::test]
async fn test_always_failing_day_is_abandoned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut scheduler = create_scheduler(&mock_server.uri(), dir.path());

    let stats = scheduler.run(day(1), day(1)).await;

    assert_eq!(stats.abandoned, 1);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.abandoned_partitions, vec![day(1)]);
    assert_eq!(scheduler.store().count_articles().unwrap(), 0);
    assert!(!dir.path().join("2018-01-01").exists());
}

#[tokio::test]
async fn test_api_error_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": { "status": "error", "message": "rate limit reached" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_page(
            1,
            vec![entry("politics/2018/jan/03/story", "article")],
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut scheduler = create_scheduler(&mock_server.uri(), dir.path());

    let stats = scheduler.run(day(3), day(3)).await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.retries, 1);
    assert_eq!(stats.records_saved, 1);
    assert!(dir
        .path()
        .join("2018-01-03/politics_2018_jan_03_story.txt")
        .is_file());
}

#[tokio::test]
async fn test_failed_day_does_not_block_others() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("from-date", "2018-01-01"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("from-date", "2018-01-02"))
        .respond_with(ok_page(
            1,
            vec![entry("politics/2018/jan/02/story", "article")],
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut scheduler = create_scheduler(&mock_server.uri(), dir.path());

    let stats = scheduler.run(day(1), day(2)).await;

    assert_eq!(stats.work_items, 2);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.abandoned, 1);
    assert_eq!(stats.abandoned_partitions, vec![day(1)]);
    assert_eq!(scheduler.store().count_articles().unwrap(), 1);
}

#[tokio::test]
async fn test_rerun_overwrites_instead_of_duplicating() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_page(
            1,
            vec![entry("politics/2018/jan/04/story", "article")],
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();

    let mut first = create_scheduler(&mock_server.uri(), dir.path());
    first.run(day(4), day(4)).await;

    let mut second = create_scheduler(&mock_server.uri(), dir.path());
    let stats = second.run(day(4), day(4)).await;

    assert_eq!(stats.records_saved, 1);
    assert_eq!(second.store().count_articles().unwrap(), 1);
}

#[tokio::test]
async fn test_run_harvest_from_config_writes_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_page(
            1,
            vec![entry("politics/2018/jan/05/story", "article")],
        ))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary_path = dir.path().join("summary.md");

    let config = Config {
        harvest: HarvestConfig {
            start_date: day(5),
            end_date: day(6),
            tries_threshold: 3,
            min_request_interval_ms: 1,
            daily_request_quota: 5000,
        },
        api: create_test_api(&mock_server.uri()),
        user_agent: create_test_user_agent(),
        output: OutputConfig {
            root_dir: dir.path().join("articles").display().to_string(),
            backend: StorageBackend::Files,
            database_path: None,
            log_path: None,
            summary_path: Some(summary_path.display().to_string()),
        },
    };

    let stats = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(stats.work_items, 2);
    assert_eq!(stats.succeeded, 2);

    // The same article id under two days lands once per day directory
    assert!(dir
        .path()
        .join("articles/2018-01-05/politics_2018_jan_05_story.txt")
        .is_file());
    assert!(dir
        .path()
        .join("articles/2018-01-06/politics_2018_jan_05_story.txt")
        .is_file());

    let summary = std::fs::read_to_string(summary_path).unwrap();
    assert!(summary.contains("| Succeeded | 2 |"));
}

#[tokio::test]
async fn test_run_harvest_with_sqlite_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_page(
            1,
            vec![
                entry("politics/2018/jan/07/a", "article"),
                entry("politics/2018/jan/07/b", "article"),
            ],
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    let config = Config {
        harvest: HarvestConfig {
            start_date: day(7),
            end_date: day(7),
            tries_threshold: 3,
            min_request_interval_ms: 1,
            daily_request_quota: 5000,
        },
        api: create_test_api(&mock_server.uri()),
        user_agent: create_test_user_agent(),
        output: OutputConfig {
            root_dir: dir.path().display().to_string(),
            backend: StorageBackend::Sqlite,
            database_path: Some(db_path.display().to_string()),
            log_path: None,
            summary_path: None,
        },
    };

    let stats = run_harvest(&config).await.expect("Harvest failed");
    assert_eq!(stats.records_saved, 2);

    let store = guardian_harvest::storage::SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.count_articles().unwrap(), 2);
    assert_eq!(store.count_partition("2018-01-07").unwrap(), 2);
}
