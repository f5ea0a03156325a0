// src/crawl/crawler.rs
// =============================================================================
// The crawl orchestrator.
//
// How one URL is processed at remaining depth `d`:
// 1. A unit of work is registered and a download job is queued
// 2. The job claims the URL in the visited registry (or stops: someone else
//    owns it)
// 3. It resolves the host and waits for a slot for that host
// 4. It downloads the page, then gives the slot back right away
// 5. If d > 1 it registers another unit and queues an extraction job, which
//    parses the page on the blocking pool and dispatches every link found
//    at depth d - 1 (step 1 again)
//
// Any failure is recorded against the URL and ends that branch only. Every
// job owns a WorkUnit, so each unit arrives exactly once however the job
// ends. crawl() waits for the tracker to reach zero, then reconciles the
// visited set with the error map.
// =============================================================================

use super::admission::HostLimiter;
use super::pool::WorkerPool;
use super::result::{CrawlResult, ErrorMap};
use super::tracker::{CompletionTracker, WorkUnit};
use super::visited::VisitedRegistry;
use crate::config::{ConfigError, CrawlerConfig};
use crate::document::{host_of, Document, Downloader};
use crate::error::CrawlError;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Recursive crawler with bounded download, extraction and per-host
/// parallelism
///
/// One crawler can run several crawls, one after another or at the same
/// time; each crawl has its own visited set, host table and error map and
/// only shares the worker pools.
pub struct WebCrawler {
    downloader: Arc<dyn Downloader>,
    downloads: Arc<WorkerPool>,
    extractors: Arc<WorkerPool>,
    per_host: usize,
}

impl WebCrawler {
    /// Creates the crawler and starts its worker pools
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn new<D>(downloader: D, config: CrawlerConfig) -> Result<Self, ConfigError>
    where
        D: Downloader + 'static,
    {
        config.validate()?;
        tokio::runtime::Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        Ok(Self {
            downloader: Arc::new(downloader),
            downloads: Arc::new(WorkerPool::new("downloads", config.downloaders)),
            extractors: Arc::new(WorkerPool::new("extractors", config.extractors)),
            per_host: config.per_host,
        })
    }

    /// Crawls from `seed`, following links up to `max_depth` levels
    ///
    /// Depth 1 downloads only the seed; depth 2 adds the pages it links to,
    /// and so on. A depth of 0 is treated like 1. Returns once every
    /// download and extraction started by this call has finished.
    ///
    /// Calling this while `shutdown` runs gives an unspecified (but
    /// consistent) result.
    pub async fn crawl(&self, seed: &str, max_depth: usize) -> CrawlResult {
        info!(
            seed,
            max_depth,
            downloaders = self.downloads.size(),
            extractors = self.extractors.size(),
            per_host = self.per_host,
            "crawl started"
        );

        let session = Arc::new(CrawlSession {
            downloader: self.downloader.clone(),
            downloads: self.downloads.clone(),
            extractors: self.extractors.clone(),
            hosts: HostLimiter::new(self.per_host),
            visited: VisitedRegistry::new(),
            errors: ErrorMap::new(),
            tracker: CompletionTracker::new(),
        });

        session.dispatch(seed.to_string(), max_depth);

        // Root unit: arrive, then wait for everything it started
        session.tracker.arrive();
        session.tracker.wait().await;

        let result = CrawlResult::reconcile(&session.visited.snapshot(), &session.errors.snapshot());
        info!(
            seed,
            downloaded = result.downloaded.len(),
            errors = result.errors.len(),
            "crawl finished"
        );
        result
    }

    /// Stops both pools. Queued and running jobs are dropped.
    ///
    /// Safe to call after `crawl` returns, and more than once.
    pub fn shutdown(&self) {
        if !self.downloads.is_shut_down() {
            debug!("shutting down crawler pools");
        }
        self.downloads.shutdown();
        self.extractors.shutdown();
    }
}

impl Drop for WebCrawler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// Everything one crawl() call shares between its jobs
struct CrawlSession {
    downloader: Arc<dyn Downloader>,
    downloads: Arc<WorkerPool>,
    extractors: Arc<WorkerPool>,
    hosts: HostLimiter,
    visited: VisitedRegistry,
    errors: ErrorMap,
    tracker: Arc<CompletionTracker>,
}

impl CrawlSession {
    // Registers a unit for `url` and queues its download
    fn dispatch(self: &Arc<Self>, url: String, depth: usize) {
        let unit = self.tracker.register();
        let session = Arc::clone(self);
        let job = async move { session.download(url, depth, unit).await }.boxed();

        // A rejected job is dropped here and its unit arrives with it
        if let Err(e) = self.downloads.submit(job) {
            debug!(pool = self.downloads.name(), "download not queued: {}", e);
        }
    }

    async fn download(self: Arc<Self>, url: String, depth: usize, _unit: WorkUnit) {
        if !self.visited.try_visit(&url) {
            debug!(url = %url, "already visited");
            return;
        }

        let host = match host_of(&url) {
            Ok(host) => host,
            Err(e) => return self.fail(&url, e),
        };

        let slot = self.hosts.acquire(&host).await;
        debug!(url = %url, host = slot.host(), depth, "downloading");
        let fetched = self.downloader.download(&url).await;
        // The slot only covers the fetch, not link extraction
        drop(slot);

        let document = match fetched {
            Ok(document) => document,
            Err(e) => return self.fail(&url, e),
        };

        if depth > 1 {
            let unit = self.tracker.register();
            let session = Arc::clone(&self);
            let job = async move { session.extract(url, document, depth, unit).await }.boxed();

            if let Err(e) = self.extractors.submit(job) {
                debug!(pool = self.extractors.name(), "extraction not queued: {}", e);
            }
        }
    }

    // Dispatches every link of a downloaded page one level deeper. Does not
    // wait for those downloads; their own units keep the crawl alive.
    //
    // Parsing is CPU-bound, so it runs on the blocking pool. The extractor
    // worker and its unit stay busy until the links are back.
    async fn extract(self: Arc<Self>, url: String, document: Box<dyn Document>, depth: usize, _unit: WorkUnit) {
        let extracted = tokio::task::spawn_blocking(move || document.extract_links()).await;

        match extracted {
            Ok(Ok(links)) => {
                debug!(url = %url, links = links.len(), "extracted links");
                for link in links {
                    self.dispatch(link, depth - 1);
                }
            }
            Ok(Err(e)) => self.fail(&url, e),
            Err(e) => {
                let error = CrawlError::extraction(&url, format!("extraction task failed: {}", e));
                self.fail(&url, error);
            }
        }
    }

    fn fail(&self, url: &str, error: CrawlError) {
        warn!(url, "{}", error);
        self.errors.record(url, error);
    }
}
