// src/crawl/result.rs
// =============================================================================
// Failure bookkeeping and the final crawl summary.
//
// ErrorMap collects failures while the crawl runs. Once the crawl has
// quiesced, CrawlResult::reconcile combines it with the visited set:
//
//   downloaded = visited - keys(errors)
//
// A page that downloaded fine but whose links could not be extracted is
// both visited and failed; it ends up in `errors` only. Every attempted URL
// lands in exactly one of the two collections.
// =============================================================================

use crate::error::CrawlError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Failures recorded during a crawl, keyed by URL
///
/// The first failure recorded for a URL is kept. Each URL is owned by a
/// single download, so in practice a URL never fails twice.
#[derive(Debug, Default)]
pub struct ErrorMap {
    errors: DashMap<String, CrawlError>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. Returns false if the URL already had one.
    pub fn record(&self, url: &str, error: CrawlError) -> bool {
        match self.errors.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(error);
                true
            }
        }
    }

    pub fn snapshot(&self) -> HashMap<String, CrawlError> {
        self.errors
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

/// Outcome of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// Pages that were downloaded and processed without error
    pub downloaded: BTreeSet<String>,
    /// Pages that failed, with the reason
    pub errors: BTreeMap<String, CrawlError>,
}

impl CrawlResult {
    /// Builds the result from the final visited set and error map
    ///
    /// Pure: the same snapshot always gives the same result.
    pub fn reconcile(visited: &HashSet<String>, errors: &HashMap<String, CrawlError>) -> Self {
        let downloaded = visited
            .iter()
            .filter(|url| !errors.contains_key(*url))
            .cloned()
            .collect();

        let errors = errors
            .iter()
            .map(|(url, error)| (url.clone(), error.clone()))
            .collect();

        Self { downloaded, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of URLs the crawl attempted
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchFailure;

    fn visited(urls: &[&str]) -> HashSet<String> {
        urls.iter().map(|url| url.to_string()).collect()
    }

    #[test]
    fn test_first_error_wins() {
        let errors = ErrorMap::new();
        assert!(errors.record("https://a/", CrawlError::fetch("https://a/", FetchFailure::Timeout, "t")));
        assert!(!errors.record("https://a/", CrawlError::extraction("https://a/", "late")));

        let snapshot = errors.snapshot();
        assert!(matches!(snapshot["https://a/"], CrawlError::Fetch { .. }));
    }

    #[test]
    fn test_failed_urls_are_not_downloaded() {
        let errors = ErrorMap::new();
        errors.record("https://a/b", CrawlError::extraction("https://a/b", "bad page"));

        let result = CrawlResult::reconcile(
            &visited(&["https://a/", "https://a/b"]),
            &errors.snapshot(),
        );

        assert_eq!(result.downloaded, BTreeSet::from(["https://a/".to_string()]));
        assert!(result.errors.contains_key("https://a/b"));
        assert!(result.downloaded.iter().all(|url| !result.errors.contains_key(url)));
        assert_eq!(result.total(), 2);
        assert!(!result.is_ok());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let errors = ErrorMap::new();
        errors.record("https://a/x", CrawlError::fetch("https://a/x", FetchFailure::Status(500), "boom"));
        let visited = visited(&["https://a/", "https://a/x", "https://a/y"]);
        let snapshot = errors.snapshot();

        let first = CrawlResult::reconcile(&visited, &snapshot);
        let second = CrawlResult::reconcile(&visited, &snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_crawl() {
        let result = CrawlResult::reconcile(&HashSet::new(), &HashMap::new());
        assert!(result.is_ok());
        assert_eq!(result.total(), 0);
    }
}
