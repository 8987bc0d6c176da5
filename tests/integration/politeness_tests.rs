use crate::common::{mount_text, TEST_AGENT};
use frontier_warden::crawler::HttpSource;
use frontier_warden::robots::PolitenessOracle;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn oracle() -> PolitenessOracle {
    let source: Arc<dyn HttpSource> = Arc::new(reqwest::Client::new());
    PolitenessOracle::with_timeout(source, Duration::from_millis(500))
}

#[tokio::test]
async fn test_allow_overrides_disallow() {
    let server = MockServer::start().await;
    mount_text(
        &server,
        "/robots.txt",
        "User-agent: *\nDisallow: /private\nAllow: /private/public\n",
    )
    .await;

    let oracle = oracle();
    let allowed = oracle
        .check_url(&format!("{}/private/public/page", server.uri()), TEST_AGENT)
        .await;
    assert!(allowed.allowed);

    let blocked = oracle
        .check_url(&format!("{}/private/secret", server.uri()), TEST_AGENT)
        .await;
    assert!(!blocked.allowed);
    assert!(blocked.reason.unwrap().contains("/private"));
}

#[tokio::test]
async fn test_robots_fetched_once_per_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /x\n"))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = Arc::new(oracle());
    let checks = (0..10).map(|i| {
        let oracle = Arc::clone(&oracle);
        let url = format!("{}/page{}", server.uri(), i);
        tokio::spawn(async move { oracle.check_url(&url, TEST_AGENT).await })
    });

    for check in checks.collect::<Vec<_>>() {
        assert!(check.await.unwrap().allowed);
    }
    assert_eq!(oracle.cached_origins(), 1);
}

#[tokio::test]
async fn test_error_status_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500).set_body_string("User-agent: *\nDisallow: /\n"))
        .mount(&server)
        .await;

    let verdict = oracle()
        .check_url(&format!("{}/anything", server.uri()), TEST_AGENT)
        .await;
    assert!(verdict.allowed);
    assert!(verdict.sitemap_urls.is_empty());
}

#[tokio::test]
async fn test_slow_robots_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /\n")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let verdict = oracle()
        .check_url(&format!("{}/anything", server.uri()), TEST_AGENT)
        .await;
    assert!(verdict.allowed);
}

#[tokio::test]
async fn test_unreachable_host_fails_open() {
    // Nothing listens on the discard port
    let verdict = oracle()
        .check_url("http://127.0.0.1:9/page", TEST_AGENT)
        .await;
    assert!(verdict.allowed);
    assert!(verdict.sitemap_urls.is_empty());
}

#[tokio::test]
async fn test_sitemap_directives_reported() {
    let server = MockServer::start().await;
    let sitemap = format!("{}/sitemap-pages.xml", server.uri());
    mount_text(
        &server,
        "/robots.txt",
        format!("Sitemap: {}\nUser-agent: *\nDisallow:\n", sitemap),
    )
    .await;

    let verdict = oracle().check_url(&server.uri(), TEST_AGENT).await;
    assert!(verdict.allowed);
    assert_eq!(verdict.sitemap_urls, vec![sitemap]);
}
