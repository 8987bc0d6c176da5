use frontier_warden::config::{
    Config, CrawlerConfig, FiltersConfig, OutputConfig, PolitenessConfig, UserAgentConfig,
};
use frontier_warden::crawler::{Coordinator, CrawlOptions, HttpSource};
use frontier_warden::robots::PolitenessOracle;
use frontier_warden::sitemap::SitemapResolver;
use frontier_warden::url::UrlCanonicalizer;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_AGENT: &str = "TestBot/1.0.0";

/// Builds a coordinator that talks to real HTTP through a plain reqwest client
pub fn coordinator_for(base_url: &str, options: CrawlOptions) -> Coordinator {
    let source: Arc<dyn HttpSource> = Arc::new(reqwest::Client::new());
    Coordinator::new(
        base_url,
        options.clone(),
        Arc::new(UrlCanonicalizer::default()),
        Arc::new(PolitenessOracle::new(Arc::clone(&source))),
        SitemapResolver::new(source, options.user_agent),
    )
    .expect("base URL should canonicalize")
}

pub fn test_options() -> CrawlOptions {
    CrawlOptions {
        user_agent: TEST_AGENT.to_string(),
        ..CrawlOptions::default()
    }
}

/// Creates a test configuration crawling `base_url` and snapshotting to `snapshot_path`
pub fn create_test_config(base_url: &str, snapshot_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            respect_robots_txt: true,
            workers: 2,
            save_every: 1,
            max_pages: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        politeness: PolitenessConfig {
            robots_timeout_ms: 2_000,
            sitemap_timeout_ms: 2_000,
            max_sitemap_depth: 4,
        },
        filters: FiltersConfig::default(),
        output: OutputConfig {
            snapshot_path: snapshot_path.to_string(),
        },
    }
}

pub async fn mount_text(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.into()))
        .mount(server)
        .await;
}

pub async fn mount_html(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body.into()),
        )
        .mount(server)
        .await;
}

pub fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

pub fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}
