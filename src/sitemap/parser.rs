//! Sitemap XML parsing
//!
//! Handles the two sitemap schemas:
//! `<urlset><url><loc>..</loc></url></urlset>` and
//! `<sitemapindex><sitemap><loc>..</loc></sitemap></sitemapindex>`.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs from a `<urlset>`
    UrlSet(Vec<String>),

    /// Child sitemap URLs from a `<sitemapindex>`
    Index(Vec<String>),

    /// Not a sitemap, or not well-formed
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    UrlSet,
    Index,
    Other,
}

#[derive(Debug, Deserialize)]
struct UrlSet {
    #[serde(rename = "url", default)]
    urls: Vec<LocEntry>,
}

#[derive(Debug, Deserialize)]
struct SitemapIndex {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<LocEntry>,
}

#[derive(Debug, Deserialize)]
struct LocEntry {
    #[serde(default)]
    loc: Option<String>,
}

/// Parses a sitemap or sitemap index; `<loc>` values are trimmed and empty ones dropped
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    match root_kind(xml) {
        RootKind::UrlSet => match quick_xml::de::from_str::<UrlSet>(xml) {
            Ok(set) => SitemapDocument::UrlSet(collect_locs(set.urls)),
            Err(_) => SitemapDocument::Unknown,
        },
        RootKind::Index => match quick_xml::de::from_str::<SitemapIndex>(xml) {
            Ok(index) => SitemapDocument::Index(collect_locs(index.sitemaps)),
            Err(_) => SitemapDocument::Unknown,
        },
        RootKind::Other => SitemapDocument::Unknown,
    }
}

fn collect_locs(entries: Vec<LocEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| entry.loc)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Looks at the first element to tell the two schemas apart
fn root_kind(xml: &str) -> RootKind {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return match e.local_name().as_ref() {
                    b"urlset" => RootKind::UrlSet,
                    b"sitemapindex" => RootKind::Index,
                    _ => RootKind::Other,
                };
            }
            Ok(Event::Eof) | Err(_) => return RootKind::Other,
            Ok(_) => continue,
        }
    }
}
