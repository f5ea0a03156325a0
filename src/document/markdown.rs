// src/document/markdown.rs
// =============================================================================
// Extracts links from Markdown pages.
//
// Some sites serve their docs as raw Markdown. pulldown-cmark turns the text
// into a stream of events; every Start(Link) event carries the destination
// of a [text](url) link. Destinations are resolved against the page URL the
// same way HTML hrefs are.
// =============================================================================

use super::resolve_link;
use crate::error::{CrawlError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use url::Url;

// Extracts all crawlable links from Markdown text
//
// Parameters:
//   markdown: the page body
//   base_url: the URL the page was downloaded from
pub fn extract_markdown_links(markdown: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url)
        .map_err(|e| CrawlError::extraction(base_url, format!("invalid base URL: {}", e)))?;

    let links = Parser::new(markdown)
        .filter_map(|event| match event {
            // Images come through as Tag::Image and are not followed
            Event::Start(Tag::Link(_, dest_url, _)) => resolve_link(&base, &dest_url),
            _ => None,
        })
        .collect();

    Ok(links)
}
