// src/crawl/visited.rs
// Set of URLs already claimed by a download during one crawl.

use dashmap::DashSet;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    urls: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for download.
    ///
    /// Returns false if another branch of the crawl already claimed it. A
    /// caller that gets true owns the download of that URL.
    pub fn try_visit(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.urls.iter().map(|url| url.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_second_visit_is_rejected() {
        let visited = VisitedRegistry::new();
        assert!(visited.try_visit("https://example.com/"));
        assert!(!visited.try_visit("https://example.com/"));
        // No normalization: a missing trailing slash is another address
        assert!(visited.try_visit("https://example.com"));
        assert_eq!(visited.snapshot().len(), 2);
    }

    #[test]
    fn test_only_one_thread_wins() {
        let visited = Arc::new(VisitedRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = visited.clone();
                std::thread::spawn(move || visited.try_visit("https://example.com/c"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
