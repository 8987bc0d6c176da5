//! Tracking-parameter, skip-extension and skip-pattern lists
//!
//! The lists are plain data. The defaults below can be replaced wholesale from
//! the `[filters]` section of the configuration file.

use url::Url;

/// Query parameters removed during normalization
///
/// Entries ending in `*` match any parameter starting with the prefix.
pub const DEFAULT_TRACKING_PARAMS: &[&str] = &[
    "utm_*",
    "fbclid",
    "gclid",
    "dclid",
    "msclkid",
    "mc_cid",
    "mc_eid",
    "_ga",
    "_gl",
    "ref",
];

/// Path suffixes for documents, archives, media and executables
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".rtf", ".csv",
    // Archives
    ".zip", ".tar", ".gz", ".tgz", ".bz2", ".rar", ".7z",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico", ".bmp", ".tiff",
    // Audio and video
    ".mp3", ".mp4", ".wav", ".ogg", ".avi", ".mov", ".mkv", ".webm", ".flac",
    // Executables and packages
    ".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm", ".apk", ".iso", ".bin",
    // Static assets
    ".css", ".js", ".json", ".xml", ".woff", ".woff2", ".ttf", ".eot",
];

/// Path fragments for admin, auth, cart, checkout, API and CMS-admin areas
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    "/admin",
    "/wp-admin",
    "/wp-login",
    "/wp-json",
    "/login",
    "/logout",
    "/signin",
    "/signup",
    "/register",
    "/auth/",
    "/oauth",
    "/account",
    "/cart",
    "/checkout",
    "/api/",
    "/cgi-bin/",
    "/user/",
    "/administrator",
];

/// Filter lists consulted by the canonicalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilters {
    tracking_params: Vec<String>,
    skip_extensions: Vec<String>,
    skip_patterns: Vec<String>,
}

impl UrlFilters {
    /// Creates filters from explicit lists; entries are compared case-insensitively
    pub fn new(
        tracking_params: Vec<String>,
        skip_extensions: Vec<String>,
        skip_patterns: Vec<String>,
    ) -> Self {
        Self {
            tracking_params: lowercase_all(tracking_params),
            skip_extensions: lowercase_all(skip_extensions),
            skip_patterns: lowercase_all(skip_patterns),
        }
    }

    pub fn tracking_params(&self) -> &[String] {
        &self.tracking_params
    }

    pub fn skip_extensions(&self) -> &[String] {
        &self.skip_extensions
    }

    pub fn skip_patterns(&self) -> &[String] {
        &self.skip_patterns
    }

    /// Checks if a query parameter is a tracking parameter
    pub fn is_tracking_param(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();

        self.tracking_params
            .iter()
            .any(|param| match param.strip_suffix('*') {
                Some(prefix) => key.starts_with(prefix),
                None => key == *param,
            })
    }

    /// Returns true if the URL path has a skipped extension or contains a skipped pattern
    pub fn should_skip(&self, url: &Url) -> bool {
        let path = url.path().to_ascii_lowercase();

        self.skip_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
            || self
                .skip_patterns
                .iter()
                .any(|pattern| path.contains(pattern.as_str()))
    }
}

impl Default for UrlFilters {
    fn default() -> Self {
        Self::new(
            to_owned_list(DEFAULT_TRACKING_PARAMS),
            to_owned_list(DEFAULT_SKIP_EXTENSIONS),
            to_owned_list(DEFAULT_SKIP_PATTERNS),
        )
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
