//! URL handling module
//!
//! This module provides URL canonicalization, domain comparison, and the
//! skip/tracking filter lists that decide which URLs are worth crawling.

mod domain;
mod filter;
mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

// Re-export main functions
pub use domain::is_same_domain;
pub use filter::{
    UrlFilters, DEFAULT_SKIP_EXTENSIONS, DEFAULT_SKIP_PATTERNS, DEFAULT_TRACKING_PARAMS,
};
pub use normalize::normalize_url;

use crate::UrlResult;

/// A URL in canonical form
///
/// Two URLs that canonicalize to the same string are the same resource for
/// every frontier purpose. Values are only produced by the canonicalizer or
/// restored from a snapshot that was written from canonical values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Wraps a string that is already in canonical form
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    /// Returns the canonical string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the canonical string
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parses the canonical string back into a `Url`
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.0)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for CanonicalUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// URL canonicalizer bound to a set of filter lists
///
/// The canonicalizer is pure: it performs no I/O and holds no mutable state,
/// so a single instance can be shared across workers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct UrlCanonicalizer {
    filters: UrlFilters,
}

impl UrlCanonicalizer {
    /// Creates a canonicalizer using the given filter lists
    pub fn new(filters: UrlFilters) -> Self {
        Self { filters }
    }

    /// Normalizes a raw URL, returning `None` for anything unparsable
    ///
    /// # Examples
    ///
    /// ```
    /// use frontier_warden::url::UrlCanonicalizer;
    ///
    /// let canonicalizer = UrlCanonicalizer::default();
    /// let url = canonicalizer.normalize("https://Example.com/Docs?b=2&a=1#top").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/docs/?a=1&b=2");
    /// assert!(canonicalizer.normalize("not a url").is_none());
    /// ```
    pub fn normalize(&self, raw: &str) -> Option<CanonicalUrl> {
        match self.try_normalize(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!("Dropping unnormalizable URL {:?}: {}", raw, e);
                None
            }
        }
    }

    /// Normalizes a raw URL, reporting why it could not be normalized
    pub fn try_normalize(&self, raw: &str) -> UrlResult<CanonicalUrl> {
        normalize::normalize_with(raw, &self.filters)
    }

    /// Returns true if the URL points at a resource the crawl should not fetch
    pub fn should_skip(&self, url: &Url) -> bool {
        self.filters.should_skip(url)
    }

    /// Returns true if both URLs share the exact same host
    pub fn is_same_domain(&self, a: &Url, b: &Url) -> bool {
        is_same_domain(a, b)
    }
}
