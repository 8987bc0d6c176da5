//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - The `HttpSource` seam used by the robots and sitemap fetchers
//! - GET requests for page content with Content-Type checks
//! - Error classification

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;

/// Failure of a single HTTP fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Not an HTML document ({content_type}) at {url}")]
    NotHtml { url: String, content_type: String },
}

impl FetchError {
    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(e) if e.is_timeout() => "timeout",
            Self::Network(e) if e.is_connect() => "connect",
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::NotHtml { .. } => "content-type",
        }
    }
}

/// Text-over-HTTP source for robots.txt and sitemap documents
///
/// Implemented for `reqwest::Client`; tests may substitute their own source.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// GETs `url` and returns the body, treating any non-2xx status as an error
    async fn get_text(&self, url: &str, user_agent: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl HttpSource for Client {
    async fn get_text(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let response = self
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use frontier_warden::config::UserAgentConfig;
/// use frontier_warden::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, requiring a successful status and an HTML Content-Type
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    Ok(response.text().await?)
}
