use crate::common::{mount_text, sitemap_index, urlset, TEST_AGENT};
use frontier_warden::crawler::HttpSource;
use frontier_warden::sitemap::SitemapResolver;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> SitemapResolver {
    let source: Arc<dyn HttpSource> = Arc::new(reqwest::Client::new());
    SitemapResolver::new(source, TEST_AGENT).with_timeout(Duration::from_millis(500))
}

#[tokio::test]
async fn test_index_of_two_sitemaps_flattens_to_four_urls() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_text(
        &server,
        "/sitemap_index.xml",
        sitemap_index(&[format!("{}/posts.xml", uri), format!("{}/pages.xml", uri)]),
    )
    .await;
    mount_text(
        &server,
        "/posts.xml",
        urlset(&[format!("{}/post/1", uri), format!("{}/post/2", uri)]),
    )
    .await;
    mount_text(
        &server,
        "/pages.xml",
        urlset(&[format!("{}/about", uri), format!("{}/contact", uri)]),
    )
    .await;

    let mut urls = resolver()
        .resolve(&format!("{}/sitemap_index.xml", uri))
        .await;
    urls.sort();

    let mut expected = vec![
        format!("{}/post/1", uri),
        format!("{}/post/2", uri),
        format!("{}/about", uri),
        format!("{}/contact", uri),
    ];
    expected.sort();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_broken_child_is_skipped() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_text(
        &server,
        "/index.xml",
        sitemap_index(&[
            format!("{}/gone.xml", uri),
            format!("{}/garbage.xml", uri),
            format!("{}/good.xml", uri),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;
    mount_text(&server, "/garbage.xml", "<html>not a sitemap</html>").await;
    mount_text(&server, "/good.xml", urlset(&[format!("{}/kept", uri)])).await;

    let urls = resolver().resolve(&format!("{}/index.xml", uri)).await;
    assert_eq!(urls, vec![format!("{}/kept", uri)]);
}

#[tokio::test]
async fn test_slow_sitemap_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&["https://example.com/late".to_string()]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let urls = resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_self_referencing_index_terminates() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/loop.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_index(&[
            format!("{}/loop.xml", uri),
            format!("{}/leaf.xml", uri),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_text(&server, "/leaf.xml", urlset(&[format!("{}/only", uri)])).await;

    let urls = resolver().resolve(&format!("{}/loop.xml", uri)).await;
    assert_eq!(urls, vec![format!("{}/only", uri)]);
}
