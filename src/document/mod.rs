// src/document/mod.rs
// =============================================================================
// Everything the crawl engine needs from the outside world.
//
// The engine never talks to the network or parses HTML itself. It only sees:
// - Downloader: turns a URL into a Document (async, may fail)
// - Document: a downloaded page that can list the links it contains
// - host_of: the host name of a URL, used to cap downloads per host
//
// Submodules:
// - http: the real downloader built on reqwest
// - html: link extraction from HTML pages
// - markdown: link extraction from Markdown pages
// =============================================================================

mod html;
mod http;
mod markdown;

pub use html::extract_html_links;
pub use http::{HtmlDocument, HttpDownloader, MarkdownDocument};
pub use markdown::extract_markdown_links;

use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use url::Url;

/// A downloaded page
///
/// `extract_links` runs on an extraction worker, never while a host slot
/// is held.
pub trait Document: Send + Sync {
    fn extract_links(&self) -> Result<Vec<String>>;
}

/// Fetches pages for the crawler
///
/// The engine records any error returned here against the URL and moves on.
/// It does not enforce a timeout: an implementation that never returns keeps
/// one download worker busy forever.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>>;
}

/// Returns the host part of a URL
///
/// Fails with `MalformedAddress` when the string is not an absolute URL or
/// has no host (e.g. `mailto:` or `file:///`).
pub fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| CrawlError::MalformedAddress {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    parsed
        .host_str()
        .map(|host| host.to_string())
        .ok_or_else(|| CrawlError::MalformedAddress {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        })
}

// Keeps only http/https links
fn is_crawlable_link(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// Resolves a possibly-relative href against the page URL
//
// Fragments are dropped so `/docs#a` and `/docs#b` are the same page.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !is_crawlable_link(&url) {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_valid_url() {
        assert_eq!(host_of("https://example.com/page").unwrap(), "example.com");
        assert_eq!(host_of("http://127.0.0.1:8080/").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_host_of_relative_url() {
        let err = host_of("/just/a/path").unwrap_err();
        assert!(matches!(err, CrawlError::MalformedAddress { .. }));
    }

    #[test]
    fn test_host_of_without_host() {
        let err = host_of("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, CrawlError::MalformedAddress { .. }));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_link(&base, "/docs"),
            Some("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_resolve_drops_fragment() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            resolve_link(&base, "guide#install"),
            Some("https://example.com/guide".to_string())
        );
    }

    #[test]
    fn test_skip_anchor_and_mailto() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(resolve_link(&base, "#section"), None);
        assert_eq!(resolve_link(&base, "mailto:test@example.com"), None);
        assert_eq!(resolve_link(&base, "javascript:void(0)"), None);
    }
}
