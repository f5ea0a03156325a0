// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Every failure that happens while crawling is attached to the URL it
// happened on and stored in the result's error map. None of them stop the
// crawl: a broken page only ends its own branch.
//
// - MalformedAddress: the URL could not be turned into a host
// - Fetch: downloading the page failed
// - Extraction: the page downloaded but its links could not be read
// =============================================================================

use serde::Serialize;
use thiserror::Error;

// Why a download failed
//
// Classified the same way a link checker reports a dead link, so the
// printed error map says more than "request failed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum FetchFailure {
    /// Request timed out
    Timeout,
    /// Redirect loop or too many hops
    TooManyRedirects,
    /// Could not resolve hostname
    Dns,
    /// SSL/TLS certificate error
    Tls,
    /// Connection refused or reset
    Connect,
    /// Server answered with a non-success status
    Status(u16),
    /// Any other transport or body error
    Other,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::TooManyRedirects => write!(f, "too many redirects"),
            FetchFailure::Dns => write!(f, "dns error"),
            FetchFailure::Tls => write!(f, "ssl error"),
            FetchFailure::Connect => write!(f, "connection failed"),
            FetchFailure::Status(code) => write!(f, "HTTP {}", code),
            FetchFailure::Other => write!(f, "error"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum CrawlError {
    #[error("malformed address {url}: {reason}")]
    MalformedAddress { url: String, reason: String },

    #[error("failed to fetch {url} ({kind}): {message}")]
    Fetch {
        url: String,
        kind: FetchFailure,
        message: String,
    },

    #[error("failed to extract links from {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("crawler has been shut down")]
    ShutDown,
}

impl CrawlError {
    pub fn fetch(url: impl Into<String>, kind: FetchFailure, message: impl Into<String>) -> Self {
        CrawlError::Fetch {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn extraction(url: impl Into<String>, message: impl Into<String>) -> Self {
        CrawlError::Extraction {
            url: url.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = CrawlError::fetch("https://example.com/a", FetchFailure::Status(404), "Not Found");
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/a (HTTP 404): Not Found"
        );
    }

    #[test]
    fn test_error_serializes_with_tag() {
        let err = CrawlError::fetch("https://example.com", FetchFailure::Timeout, "slow");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "fetch");
        assert_eq!(json["kind"]["kind"], "timeout");
    }
}
