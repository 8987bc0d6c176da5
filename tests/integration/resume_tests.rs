use crate::common::{coordinator_for, create_test_config, mount_html, test_options};
use frontier_warden::crawler::{run_crawl, CrawlPhase};
use frontier_warden::state::UrlState;
use frontier_warden::storage::{JsonFileStore, SnapshotStore};
use frontier_warden::url::UrlCanonicalizer;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_in_flight_url_is_requeued_after_reload() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let base = format!("{}/", uri);

    let coordinator = coordinator_for(&base, test_options());
    coordinator.initialize().await.unwrap();
    coordinator
        .discover(r#"<a href="/a">A</a><a href="/b">B</a>"#, &base)
        .await
        .unwrap();

    let home = coordinator.next_url().unwrap();
    coordinator.mark_completed(&home).unwrap();
    let interrupted = coordinator.next_url().unwrap();

    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));
    coordinator.save_state(&store).unwrap();

    // The raw file keeps the in-flight URL under "processing"
    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(raw["queue"]["processing"][0], interrupted.as_str());
    assert_eq!(raw["baseUrl"], base.as_str());

    let resumed = coordinator_for("https://placeholder.example/", test_options());
    assert!(resumed.load_state(&store).unwrap());
    assert_eq!(resumed.base_url().as_str(), base);
    assert_eq!(resumed.phase(), CrawlPhase::Seeded);

    let stats = resumed.stats();
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.in_flight, 0);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.total, 3);

    let snapshot = resumed.snapshot();
    let occurrences = snapshot
        .queue
        .pending
        .iter()
        .chain(&snapshot.queue.completed)
        .filter(|u| **u == interrupted)
        .count();
    assert_eq!(occurrences, 1);
}

#[tokio::test]
async fn test_resumed_crawl_skips_completed_pages() {
    let server = MockServer::start().await;
    let uri = server.uri();

    // The home page was finished in the previous run and must not be fetched again
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_html(&server, "/left-over/", "<p>done</p>").await;
    mount_html(&server, "/was-running/", "<p>done</p>").await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("state.json");
    let previous = format!(
        r#"{{
            "baseUrl": "{uri}/",
            "startedAt": "2024-03-01T12:00:00Z",
            "lastSavedAt": "2024-03-01T12:10:00Z",
            "queue": {{
                "pending": ["{uri}/left-over/"],
                "processing": ["{uri}/was-running/"],
                "completed": ["{uri}/"],
                "failed": []
            }}
        }}"#
    );
    std::fs::write(&snapshot_path, previous).unwrap();

    let mut config = create_test_config(&format!("{}/", uri), snapshot_path.to_str().unwrap());
    config.crawler.respect_robots_txt = false;

    let report = run_crawl(&config, false).await.unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.stats.completed, 3);
    assert_eq!(report.stats.total, 3);

    let snapshot = JsonFileStore::new(&snapshot_path).load().unwrap().unwrap();
    assert_eq!(snapshot.started_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    assert!(snapshot.last_saved_at > snapshot.started_at);

    let (_, frontier) = snapshot.restore(&UrlCanonicalizer::default()).unwrap();
    assert_eq!(frontier.urls_in(UrlState::Completed).len(), 3);
}

#[tokio::test]
async fn test_resume_folds_equivalent_snapshot_entries() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/left-over/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<p>done</p>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("state.json");
    let previous = format!(
        r#"{{
            "baseUrl": "{uri}/",
            "startedAt": "2024-03-01T12:00:00Z",
            "lastSavedAt": "2024-03-01T12:10:00Z",
            "queue": {{
                "pending": ["{uri}/Left-Over", "{uri}/?utm_source=mail"],
                "processing": ["{uri}/left-over/#top"],
                "completed": ["{uri}/"]
            }}
        }}"#
    );
    std::fs::write(&snapshot_path, previous).unwrap();

    let mut config = create_test_config(&format!("{}/", uri), snapshot_path.to_str().unwrap());
    config.crawler.respect_robots_txt = false;

    let report = run_crawl(&config, false).await.unwrap();
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.stats.completed, 2);
    assert_eq!(report.stats.total, 2);
}

#[tokio::test]
async fn test_fresh_flag_ignores_snapshot() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_html(&server, "/", "<p>home</p>").await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("state.json");
    std::fs::write(&snapshot_path, "this would fail to parse").unwrap();

    let mut config = create_test_config(&format!("{}/", uri), snapshot_path.to_str().unwrap());
    config.crawler.respect_robots_txt = false;

    let report = run_crawl(&config, true).await.unwrap();
    assert_eq!(report.stats.completed, 1);

    // The unreadable file was replaced by a valid snapshot
    assert!(JsonFileStore::new(&snapshot_path).load().unwrap().is_some());
}
