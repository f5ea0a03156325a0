// src/lib.rs
// =============================================================================
// link-crawler: a recursive web crawler.
//
// Give it a seed URL and a depth; it downloads every page reachable within
// that many link hops, each page at most once, with a fixed number of
// download workers, a fixed number of link extraction workers and a cap on
// simultaneous downloads per host. The result lists the pages that were
// downloaded and the pages that failed, with the reason.
//
// Modules:
// - crawl: the engine (WebCrawler and its building blocks)
// - document: Downloader/Document traits and the HTTP implementation
// - config: pool sizes, per-host limit, HTTP settings
// - error: failure types recorded per URL
// =============================================================================

pub mod config;
pub mod crawl;
pub mod document;
pub mod error;

pub use config::{ConfigError, CrawlerConfig, HttpConfig};
pub use crawl::{CrawlResult, WebCrawler};
pub use document::{host_of, Document, Downloader, HttpDownloader};
pub use error::{CrawlError, FetchFailure};
