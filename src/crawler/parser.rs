//! HTML link extraction
//!
//! Anchors are the only link source. Results are absolute but not
//! normalized, and may contain duplicates.

use scraper::{Html, Selector};
use url::Url;

/// Extracts the absolute targets of every `<a href>` in `html`
///
/// # Exclusions
///
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same page anchors)
/// - Hrefs that cannot be resolved against `base_url`
/// - Non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use frontier_warden::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
