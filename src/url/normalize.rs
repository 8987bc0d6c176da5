use crate::url::{CanonicalUrl, UrlFilters};
use crate::UrlError;
use url::Url;

/// Normalizes a URL using the default filter lists
///
/// # Normalization Steps
///
/// 1. Parse the URL as absolute; reject if malformed
/// 2. Reject schemes other than http and https, and URLs without a host
/// 3. Lowercase the host
/// 4. Lowercase the path and append `/` when the last segment has no extension
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters
/// 7. Sort remaining query parameters by key
/// 8. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use frontier_warden::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM/Page?utm_source=feed#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<CanonicalUrl, UrlError> {
    normalize_with(url_str, &UrlFilters::default())
}

pub(crate) fn normalize_with(url_str: &str, filters: &UrlFilters) -> Result<CanonicalUrl, UrlError> {
    // Step 1: Parse the URL
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 2: Validate scheme and host
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlError::MissingDomain)?;

    // Step 3: Lowercase the host
    let lowered = host.to_lowercase();
    if lowered != host {
        url.set_host(Some(&lowered))
            .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;
    }

    // Step 4: Normalize path
    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    // Step 5: Remove fragment
    url.set_fragment(None);

    // Step 6-8: Filter and sort query parameters
    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url, filters);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params.iter());
        }
    }

    Ok(CanonicalUrl::from_normalized(url.into()))
}

/// Lowercases a path and appends `/` when the final segment has no extension
///
/// Case-folding merges paths that a case-sensitive server would treat as
/// distinct resources.
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized = path.to_lowercase();
    let last_segment = normalized.rsplit('/').next().unwrap_or("");

    if !last_segment.is_empty() && !last_segment.contains('.') {
        normalized.push('/');
    }

    normalized
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url, filters: &UrlFilters) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !filters.is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    // Stable sort keeps repeated keys in their original order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}
