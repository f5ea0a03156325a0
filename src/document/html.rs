// src/document/html.rs
// =============================================================================
// Extracts links from HTML pages.
//
// The `scraper` crate parses the page into a DOM and lets us select every
// <a href> with a CSS selector. Each href is resolved against the page URL
// with the `url` crate so relative links become absolute.
//
// Only http/https links are returned; anchors, mailto:, tel:, javascript:
// and friends are dropped. Duplicates inside one page are kept: the crawler's
// visited registry is what guarantees each page is downloaded once.
// =============================================================================

use super::resolve_link;
use crate::error::{CrawlError, Result};
use scraper::{Html, Selector};
use url::Url;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the page body
//   base_url: the URL the page was downloaded from
//
// Fails when base_url cannot be parsed, since relative links could not be
// resolved.
pub fn extract_html_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url)
        .map_err(|e| CrawlError::extraction(base_url, format!("invalid base URL: {}", e)))?;

    let selector = Selector::parse("a[href]")
        .map_err(|e| CrawlError::extraction(base_url, e.to_string()))?;

    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(&base, href))
        .collect();

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://docs.example.org/guide/intro.html";

    #[test]
    fn test_hrefs_resolve_against_page_directory() {
        let html = r#"
            <nav><a href="setup.html">Setup</a></nav>
            <p>See <a href="../api/index.html">the API</a> or <a href="/">home</a>.</p>
        "#;
        let links = extract_html_links(html, PAGE).unwrap();
        assert_eq!(
            links,
            vec![
                "https://docs.example.org/guide/setup.html",
                "https://docs.example.org/api/index.html",
                "https://docs.example.org/",
            ]
        );
    }

    #[test]
    fn test_fragments_are_dropped() {
        let html = r##"
            <a href="#install">Install</a>
            <a href="setup.html#requirements">Requirements</a>
        "##;
        let links = extract_html_links(html, PAGE).unwrap();
        assert_eq!(links, vec!["https://docs.example.org/guide/setup.html"]);
    }

    #[test]
    fn test_only_web_schemes_are_kept() {
        let html = r#"
            <a href="mailto:docs@example.org">Mail</a>
            <a href="javascript:void(0)">Menu</a>
            <a href="ftp://files.example.org/pub">Mirror</a>
            <a href="  ">Blank</a>
            <a name="anchor-only">No href</a>
            <a href="http://other.example.net/page">Other site</a>
        "#;
        let links = extract_html_links(html, PAGE).unwrap();
        assert_eq!(links, vec!["http://other.example.net/page"]);
    }

    #[test]
    fn test_duplicate_hrefs_are_kept() {
        let html = r#"<a href="setup.html">top</a><a href="setup.html">bottom</a>"#;
        let links = extract_html_links(html, PAGE).unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let err = extract_html_links("<a href='/x'>x</a>", "not a url").unwrap_err();
        match err {
            CrawlError::Extraction { url, message } => {
                assert_eq!(url, "not a url");
                assert!(message.contains("invalid base URL"));
            }
            other => panic!("expected an extraction error, got {:?}", other),
        }
    }
}
