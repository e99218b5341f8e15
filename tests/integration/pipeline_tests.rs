//! Integration tests for the preservation pipeline
//!
//! These tests use wiremock to stand in for the archive's capture and
//! availability endpoints and run the full pipeline end-to-end.

use archivelinks::archive::{archive_links, build_scheduler, ChannelProgressSink, ProgressEvent};
use archivelinks::config::Config;
use archivelinks::output::{retry_set, to_csv_string, write_csv};
use archivelinks::{ItemStatus, LinkSet, RunKind};
use tempfile::TempDir;
use tokio::sync::mpsc::unbounded_channel;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOT_INDEXED: &str = r#"{"archived_snapshots":{}}"#;

fn snapshot_body(target: &str) -> String {
    format!(
        r#"{{"archived_snapshots":{{"closest":{{"status":"200","available":true,"url":"http://web.archive.org/web/20240101000000/{}","timestamp":"20240101000000"}}}}}}"#,
        target
    )
}

/// Creates a test configuration pointing at the given endpoints
fn create_test_config(save_endpoint: String, availability_endpoint: String) -> Config {
    let mut config = Config::default();
    config.archive.save_endpoint = save_endpoint;
    config.archive.availability_endpoint = availability_endpoint;
    config.archive.submit_timeout_ms = 2000;
    config.archive.availability_timeout_ms = 2000;
    config.archive.preserve_deadline_ms = 10_000;
    config.archive.poll_attempts = 3;
    config.archive.poll_delay_ms = 20; // Very short for testing
    config.scheduler.max_concurrent_saves = 5;
    config.scheduler.worker_stagger_ms = 10;
    config
}

async fn mount_save_endpoint(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/save/.+"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_link_saved_after_third_poll() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path_regex(r"^/save/.+"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // First two checks find nothing, the third finds the snapshot
    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://example.org/paper"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOT_INDEXED))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://example.org/paper"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(snapshot_body("https://example.org/paper")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(
        format!("{}/save", base_url),
        format!("{}/wayback/available", base_url),
    );
    let scheduler = build_scheduler(&config).expect("Failed to build scheduler");
    let mut links = LinkSet::from_extracted(["example.org/paper "]);
    let (tx, mut rx) = unbounded_channel();

    let (report, summary) = archive_links(
        &mut links,
        RunKind::Full,
        &scheduler,
        &ChannelProgressSink::new(tx),
    )
    .await
    .expect("Archive run failed");

    assert_eq!(report.processed, 1);
    let item = &links.items()[0];
    assert_eq!(item.original_url().as_str(), "https://example.org/paper");
    assert_eq!(item.status(), ItemStatus::Saved);
    assert_eq!(
        item.archived_url(),
        Some("https://web.archive.org/web/20240101000000/https://example.org/paper")
    );
    assert_eq!(
        summary.message(),
        "Archive run finished. 1/1 included links archived."
    );

    let mut finished = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ProgressEvent::ItemFinished {
            status, percent, ..
        } = event
        {
            finished.push((status, percent));
        }
    }
    assert_eq!(finished, vec![(ItemStatus::Saved, 100)]);

    // Results export
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("results.csv");
    write_csv(&links, &csv_path).expect("Failed to write CSV");
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains(r#""https://example.org/paper","https://web.archive.org/web/20240101000000/https://example.org/paper","saved","true","""#));
}

#[tokio::test]
async fn test_unreachable_save_endpoint_is_save_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOT_INDEXED))
        .expect(3)
        .mount(&server)
        .await;

    // Nothing listens on port 1: both capture transports fail to connect
    let config = create_test_config(
        "http://127.0.0.1:1/save".to_string(),
        format!("{}/wayback/available", server.uri()),
    );
    let scheduler = build_scheduler(&config).expect("Failed to build scheduler");
    let mut links = LinkSet::from_extracted(["https://example.org/gone"]);
    let (tx, _rx) = unbounded_channel();

    let (_, summary) = archive_links(
        &mut links,
        RunKind::Full,
        &scheduler,
        &ChannelProgressSink::new(tx),
    )
    .await
    .expect("Archive run failed");

    assert_eq!(links.items()[0].status(), ItemStatus::SaveRequestFailed);
    assert_eq!(links.items()[0].archived_url(), None);
    assert_eq!(summary.save_request_failed, 1);
    assert_eq!(
        summary.message(),
        "Archive run finished. 0/1 included links archived. 1 unresolved (0 timed out, 1 failed, 0 not yet indexed)."
    );
}

#[tokio::test]
async fn test_retry_run_only_touches_unresolved_links() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_save_endpoint(&server).await;

    // Already archived: checked exactly once, in the full run
    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://example.org/fast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(snapshot_body("https://example.org/fast")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Not indexed during the full run, found during the retry
    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://example.org/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOT_INDEXED))
        .up_to_n_times(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://example.org/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(snapshot_body("https://example.org/slow")),
        )
        .mount(&server)
        .await;

    let config = create_test_config(
        format!("{}/save", base_url),
        format!("{}/wayback/available", base_url),
    );
    let scheduler = build_scheduler(&config).expect("Failed to build scheduler");
    let mut links = LinkSet::from_extracted([
        "https://example.org/fast",
        "https://example.org/slow",
        "https://doi.org/10.1000/182",
    ]);
    let (tx, _rx) = unbounded_channel();
    let sink = ChannelProgressSink::new(tx);

    let (_, summary) = archive_links(&mut links, RunKind::Full, &scheduler, &sink)
        .await
        .expect("Full run failed");

    assert_eq!(summary.saved, 1);
    assert_eq!(summary.not_yet_indexed, 1);
    assert_eq!(summary.skipped, 1);
    let saved_before = links.items()[0].clone();
    assert_eq!(retry_set(&links), vec![links.items()[1].id()]);

    let (report, summary) = archive_links(&mut links, RunKind::RetryUnresolved, &scheduler, &sink)
        .await
        .expect("Retry run failed");

    assert_eq!(report.processed, 1);
    assert_eq!(summary.saved, 2);
    assert!(summary.all_saved());
    assert_eq!(links.items()[0], saved_before);
    assert_eq!(links.items()[1].status(), ItemStatus::Saved);
    assert_eq!(links.items()[2].status(), ItemStatus::Skipped);
    assert!(retry_set(&links).is_empty());

    let csv = to_csv_string(&links);
    assert!(csv.contains(r#""https://doi.org/10.1000/182","","skipped","false","doi""#));
}
