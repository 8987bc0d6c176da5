use crate::url::UrlFilters;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub politeness: PolitenessConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    pub output: OutputConfig,
}

/// Crawl target and driver behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// The URL the crawl starts from; discovery is restricted to its host
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Whether robots.txt rules and sitemaps are consulted
    #[serde(rename = "respect-robots-txt", default = "default_true")]
    pub respect_robots_txt: bool,

    /// Number of concurrent pull workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Save a snapshot after this many finished pages (0 = only at the end)
    #[serde(rename = "save-every", default = "default_save_every")]
    pub save_every: u32,

    /// Stop dispatching after this many pages (0 = unlimited)
    #[serde(rename = "max-pages", default)]
    pub max_pages: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt agent token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn user_agent_string(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "FrontierWarden".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Network bounds for the robots.txt and sitemap fetches
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    #[serde(rename = "robots-timeout-ms", default = "default_robots_timeout")]
    pub robots_timeout_ms: u64,

    #[serde(rename = "sitemap-timeout-ms", default = "default_sitemap_timeout")]
    pub sitemap_timeout_ms: u64,

    /// How many sitemap-index levels are followed below the first document
    #[serde(rename = "max-sitemap-depth", default = "default_sitemap_depth")]
    pub max_sitemap_depth: u32,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            robots_timeout_ms: default_robots_timeout(),
            sitemap_timeout_ms: default_sitemap_timeout(),
            max_sitemap_depth: default_sitemap_depth(),
        }
    }
}

/// Overrides for the canonicalizer's filter lists
///
/// Each list replaces the built-in default when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersConfig {
    #[serde(rename = "tracking-params", default)]
    pub tracking_params: Option<Vec<String>>,

    #[serde(rename = "skip-extensions", default)]
    pub skip_extensions: Option<Vec<String>>,

    #[serde(rename = "skip-patterns", default)]
    pub skip_patterns: Option<Vec<String>>,
}

impl FiltersConfig {
    /// Builds the filter lists, falling back to defaults for omitted lists
    pub fn to_filters(&self) -> UrlFilters {
        let defaults = UrlFilters::default();
        UrlFilters::new(
            self.tracking_params
                .clone()
                .unwrap_or_else(|| defaults.tracking_params().to_vec()),
            self.skip_extensions
                .clone()
                .unwrap_or_else(|| defaults.skip_extensions().to_vec()),
            self.skip_patterns
                .clone()
                .unwrap_or_else(|| defaults.skip_patterns().to_vec()),
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON snapshot file
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,
}

fn default_true() -> bool {
    true
}

fn default_workers() -> u32 {
    4
}

fn default_save_every() -> u32 {
    25
}

fn default_robots_timeout() -> u64 {
    5_000
}

fn default_sitemap_timeout() -> u64 {
    10_000
}

fn default_sitemap_depth() -> u32 {
    4
}
