// src/document/http.rs
// =============================================================================
// Downloads pages over HTTP with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling, timeout, redirect limit)
// - Non-2xx answers are failures, classified by status code
// - Transport errors are classified (timeout, DNS, TLS, ...) so the error
//   map tells the user what went wrong
// - The Content-Type decides how links are extracted later: Markdown pages
//   go to pulldown-cmark, HTML to scraper, anything else yields no links
// - Relative links resolve against the address the server finally answered
//   from, after redirects; the crawl still files the page under the address
//   it asked for
// =============================================================================

use super::{extract_html_links, extract_markdown_links, Document, Downloader};
use crate::config::HttpConfig;
use crate::error::{CrawlError, FetchFailure, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

/// A downloaded HTML page
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// Base for relative links
    pub url: String,
    pub body: String,
}

impl Document for HtmlDocument {
    fn extract_links(&self) -> Result<Vec<String>> {
        extract_html_links(&self.body, &self.url)
    }
}

/// A downloaded Markdown page
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    pub url: String,
    pub body: String,
}

impl Document for MarkdownDocument {
    fn extract_links(&self) -> Result<Vec<String>> {
        extract_markdown_links(&self.body, &self.url)
    }
}

// Anything we can't read links from (images, PDFs, ...)
struct OpaqueDocument;

impl Document for OpaqueDocument {
    fn extract_links(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Html,
    Markdown,
    Opaque,
}

// Picks a link extractor from the Content-Type header, falling back to the
// file extension when the server sends none
fn page_kind(content_type: Option<&str>, url: &str) -> PageKind {
    let mime = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("text/markdown") | Some("text/x-markdown") => PageKind::Markdown,
        Some("text/html") | Some("application/xhtml+xml") => PageKind::Html,
        Some("text/plain") | None if url.ends_with(".md") => PageKind::Markdown,
        None => PageKind::Html,
        Some(_) => PageKind::Opaque,
    }
}

pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(config: &HttpConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::fetch(
                url,
                FetchFailure::Status(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // `/docs` redirected to `/docs/` must resolve `guide` to `/docs/guide`
        let base = response.url().to_string();
        if base != url {
            debug!(url, base = %base, "followed redirect");
        }

        let kind = page_kind(content_type.as_deref(), &base);
        if kind == PageKind::Opaque {
            return Ok(Box::new(OpaqueDocument));
        }

        let body = response.text().await.map_err(|e| categorize_error(url, e))?;

        Ok(match kind {
            PageKind::Markdown => Box::new(MarkdownDocument { url: base, body }),
            _ => Box::new(HtmlDocument { url: base, body }),
        })
    }
}

// Categorizes reqwest errors into a FetchFailure
fn categorize_error(url: &str, error: reqwest::Error) -> CrawlError {
    let message = error.to_string();
    let lowered = message.to_lowercase();

    let kind = if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_connect() {
        if lowered.contains("dns") {
            FetchFailure::Dns
        } else {
            FetchFailure::Connect
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") {
        FetchFailure::Tls
    } else {
        FetchFailure::Other
    };

    CrawlError::fetch(url, kind, message)
}
