// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Pieces, from the bottom up:
// - admission: caps simultaneous downloads per host
// - visited: makes sure each URL is downloaded at most once
// - tracker: knows when every spawned download/extraction has finished
// - pool: fixed-size worker pools (one for downloads, one for extraction)
// - result: error bookkeeping and the final summary
// - crawler: WebCrawler, which wires the above together
// =============================================================================

mod admission;
mod crawler;
mod pool;
mod result;
mod tracker;
mod visited;

pub use admission::{HostLimiter, HostSlot};
pub use crawler::WebCrawler;
pub use pool::{Job, WorkerPool};
pub use result::{CrawlResult, ErrorMap};
pub use tracker::{CompletionTracker, WorkUnit};
pub use visited::VisitedRegistry;
