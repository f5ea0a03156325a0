// src/crawl/admission.rs
// =============================================================================
// Per-host admission control.
//
// Each host gets its own semaphore with `per_host` permits, created the first
// time the host is seen. A download holds one permit while it fetches and
// gives it back by dropping the HostSlot guard, which wakes the next waiter
// for that host. Hosts never wait on each other.
//
// A limit of 0 makes every acquire wait forever. CrawlerConfig::validate
// rejects it, so the limiter itself does not special-case it.
// =============================================================================

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A download slot for one host; dropping it releases the slot
#[derive(Debug)]
pub struct HostSlot {
    host: String,
    _permit: OwnedSemaphorePermit,
}

impl HostSlot {
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[derive(Debug)]
pub struct HostLimiter {
    per_host: usize,
    hosts: DashMap<String, Arc<Semaphore>>,
}

impl HostLimiter {
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host,
            hosts: DashMap::new(),
        }
    }

    // Finds or creates the semaphore for a host. The shard lock is released
    // before anyone waits for a permit.
    fn semaphore(&self, host: &str) -> Arc<Semaphore> {
        self.hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
            .clone()
    }

    /// Waits until `host` has fewer than `per_host` downloads in flight,
    /// then takes a slot
    pub async fn acquire(&self, host: &str) -> HostSlot {
        let permit = self
            .semaphore(host)
            .acquire_owned()
            .await
            .expect("host semaphores are never closed");

        HostSlot {
            host: host.to_string(),
            _permit: permit,
        }
    }

    #[cfg(test)]
    fn in_flight(&self, host: &str) -> usize {
        self.hosts
            .get(host)
            .map(|semaphore| self.per_host - semaphore.available_permits())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unseen_host_starts_empty() {
        let limiter = HostLimiter::new(2);
        assert_eq!(limiter.in_flight("example.com"), 0);

        let slot = limiter.acquire("example.com").await;
        assert_eq!(slot.host(), "example.com");
        assert_eq!(limiter.in_flight("example.com"), 1);

        drop(slot);
        assert_eq!(limiter.in_flight("example.com"), 0);
    }

    #[tokio::test]
    async fn test_blocks_when_host_is_full() {
        let limiter = Arc::new(HostLimiter::new(1));
        let first = limiter.acquire("a.com").await;

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire("a.com").await.host().to_string() })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken by the release")
            .unwrap();
    }

    #[tokio::test]
    async fn test_hosts_are_independent() {
        let limiter = HostLimiter::new(1);
        let _a = limiter.acquire("a.com").await;

        let b = tokio::time::timeout(Duration::from_millis(200), limiter.acquire("b.com")).await;
        assert!(b.is_ok(), "a full host must not block another host");
    }
}
