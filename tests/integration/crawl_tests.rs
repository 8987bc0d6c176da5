use crate::common::{coordinator_for, create_test_config, mount_html, mount_text, test_options, urlset};
use frontier_warden::crawler::{run_crawl, CrawlOptions, CrawlPhase};
use frontier_warden::state::UrlState;
use frontier_warden::storage::{JsonFileStore, SnapshotStore};
use frontier_warden::url::UrlCanonicalizer;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_initialize_respects_robots_and_sitemap() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_text(&server, "/robots.txt", "User-agent: *\nDisallow: /admin\n").await;
    mount_text(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/a", uri), format!("{}/admin/x", uri)]),
    )
    .await;

    let coordinator = coordinator_for(&format!("{}/", uri), test_options());
    coordinator.initialize().await.unwrap();
    assert_eq!(coordinator.phase(), CrawlPhase::Seeded);

    let snapshot = coordinator.snapshot();
    let pending: Vec<String> = snapshot
        .queue
        .pending
        .iter()
        .map(|u| u.to_string())
        .collect();

    assert_eq!(pending, vec![format!("{}/", uri), format!("{}/a/", uri)]);
    assert!(!pending.iter().any(|u| u.contains("/admin")));
}

#[tokio::test]
async fn test_sitemaps_from_robots_are_seeded() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_text(
        &server,
        "/robots.txt",
        format!("User-agent: *\nAllow: /\nSitemap: {}/custom-map.xml\n", uri),
    )
    .await;
    mount_text(
        &server,
        "/custom-map.xml",
        urlset(&[
            format!("{}/from-robots", uri),
            "https://elsewhere.example/page".to_string(),
            format!("{}/brochure.pdf", uri),
        ]),
    )
    .await;

    let coordinator = coordinator_for(&format!("{}/", uri), test_options());
    let added = coordinator.initialize().await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(coordinator.stats().pending, 2);
}

#[tokio::test]
async fn test_discover_never_leaves_base_host() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_text(&server, "/robots.txt", "User-agent: *\nDisallow: /private\n").await;

    let coordinator = coordinator_for(&format!("{}/", uri), test_options());
    coordinator.initialize().await.unwrap();

    let html = format!(
        r#"<html><body>
        <a href="/one">One</a>
        <a href="{uri}/two?utm_campaign=x">Two</a>
        <a href="/private/area">Private</a>
        <a href="https://example.org/elsewhere">Elsewhere</a>
        <a href="http://localhost:1/other-host">Other host</a>
        </body></html>"#
    );

    let added = coordinator
        .discover(&html, &format!("{}/", uri))
        .await
        .unwrap();
    let added: Vec<String> = added.iter().map(|u| u.to_string()).collect();

    assert_eq!(added, vec![format!("{}/one/", uri), format!("{}/two/", uri)]);
    for url in &added {
        assert!(url.starts_with(&uri), "{} left the base host", url);
    }
}

#[tokio::test]
async fn test_discover_without_robots_checks() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;

    let options = CrawlOptions {
        respect_robots_txt: false,
        ..test_options()
    };
    let coordinator = coordinator_for(&format!("{}/", uri), options);
    coordinator.initialize().await.unwrap();

    let added = coordinator
        .discover(r#"<a href="/blocked-but-ignored">x</a>"#, &format!("{}/", uri))
        .await
        .unwrap();
    assert_eq!(added.len(), 1);
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_text(&server, "/robots.txt", "User-agent: *\nDisallow: /secret\n").await;
    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{uri}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/secret/plans">Secret</a>
            <a href="/admin/">Admin</a>
            <a href="https://other.example/">External</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(&server, "/page1/", r#"<a href="/">Home</a><a href="/page1">Self</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/page2/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("state.json");
    let config = create_test_config(&format!("{}/", uri), snapshot_path.to_str().unwrap());

    let report = run_crawl(&config, true).await.unwrap();

    assert!(!report.interrupted);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.stats.completed, 2);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.pending, 0);
    assert_eq!(report.stats.in_flight, 0);
    assert_eq!(report.stats.total, 3);

    let snapshot = JsonFileStore::new(&snapshot_path).load().unwrap().unwrap();
    let (_, frontier) = snapshot.restore(&UrlCanonicalizer::default()).unwrap();
    let page2 = frontier
        .urls_in(UrlState::Failed)
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(page2.to_string(), format!("{}/page2/", uri));
}

#[tokio::test]
async fn test_page_budget_stops_crawl() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
        .collect();
    mount_html(&server, "/", links).await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<p>leaf</p>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("state.json");
    let mut config = create_test_config(&format!("{}/", uri), snapshot_path.to_str().unwrap());
    config.crawler.max_pages = 4;
    config.crawler.workers = 1;
    config.crawler.respect_robots_txt = false;

    let report = run_crawl(&config, true).await.unwrap();

    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.stats.completed, 4);
    assert_eq!(report.stats.total, 11);

    // Everything unfinished is pending again after a reload
    let snapshot = JsonFileStore::new(&snapshot_path).load().unwrap().unwrap();
    let (_, frontier) = snapshot.restore(&UrlCanonicalizer::default()).unwrap();
    assert_eq!(frontier.stats().pending, 7);
}
