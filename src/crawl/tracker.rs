// src/crawl/tracker.rs
// =============================================================================
// Completion tracking for a crawl whose size is not known up front.
//
// The tracker counts units of work that have been started but not finished.
// It starts at 1 for the root (the crawl call itself). Every download or
// extraction task is registered before it is handed to a pool, and arrives
// when it is done. When the count drops back to 0 nothing is running and
// nothing can start any more, so whoever is waiting may read the results.
//
// register() hands back a WorkUnit guard that arrives when dropped. Jobs own
// their unit, so a job that finishes, fails, panics or is thrown away by a
// shut-down pool still arrives exactly once.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct CompletionTracker {
    pending: AtomicUsize,
    done: Notify,
}

impl CompletionTracker {
    /// New tracker with the root unit already registered
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicUsize::new(1),
            done: Notify::new(),
        })
    }

    /// Registers a unit of work. Must be called before the work is submitted.
    pub fn register(self: &Arc<Self>) -> WorkUnit {
        let previous = self.pending.fetch_add(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "register after the crawl quiesced");
        WorkUnit {
            tracker: Arc::clone(self),
        }
    }

    /// Marks one unit as finished and wakes waiters when none are left
    pub fn arrive(&self) {
        let previous = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => self.done.notify_waiters(),
            Ok(_) => {}
            Err(_) => debug_assert!(false, "arrive on a quiesced tracker"),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Waits until every registered unit has arrived. Returns immediately on
    /// a tracker that already reached zero.
    pub async fn wait(&self) {
        loop {
            let notified = self.done.notified();
            tokio::pin!(notified);
            // Enable before checking so a notify between the check and the
            // await is not lost
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One registered unit of work; arrives when dropped
#[derive(Debug)]
pub struct WorkUnit {
    tracker: Arc<CompletionTracker>,
}

impl Drop for WorkUnit {
    fn drop(&mut self) {
        self.tracker.arrive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_root_only() {
        let tracker = CompletionTracker::new();
        assert_eq!(tracker.pending(), 1);
        tracker.arrive();
        tracker.wait().await;
        // A second wait on a quiesced tracker returns straight away
        tracker.wait().await;
    }

    #[tokio::test]
    async fn test_units_keep_tracker_alive() {
        let tracker = CompletionTracker::new();
        let unit = tracker.register();
        tracker.arrive();
        assert_eq!(tracker.pending(), 1);

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(unit);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released")
            .unwrap();
        assert_eq!(tracker.pending(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_nested_registration() {
        let tracker = CompletionTracker::new();

        // Each task spawns two children before arriving itself
        fn spawn_tree(unit: WorkUnit, tracker: Arc<CompletionTracker>, depth: u32) {
            tokio::spawn(async move {
                if depth > 0 {
                    for _ in 0..2 {
                        spawn_tree(tracker.register(), tracker.clone(), depth - 1);
                    }
                }
                drop(unit);
            });
        }

        spawn_tree(tracker.register(), tracker.clone(), 6);
        tracker.arrive();

        tokio::time::timeout(Duration::from_secs(5), tracker.wait())
            .await
            .expect("tree should finish");
        assert_eq!(tracker.pending(), 0);
    }
}
