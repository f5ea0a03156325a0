// src/crawl/pool.rs
// =============================================================================
// A fixed-size pool of worker tasks.
//
// `size` long-lived tokio tasks pull jobs from one unbounded queue, so at most
// `size` jobs run at once while submission never blocks. The crawler uses two
// of these: downloads and link extraction. Extraction jobs submit downloads
// and downloads submit extraction jobs; with a single pool every worker could
// end up waiting on work that needs a free worker to run.
//
// shutdown() closes the queue and aborts the workers. Queued and running jobs
// are dropped, not drained.
// =============================================================================

use crate::error::{CrawlError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

pub type Job = BoxFuture<'static, ()>;

pub struct WorkerPool {
    name: &'static str,
    size: usize,
    sender: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Starts `size` workers on the current Tokio runtime
    pub fn new(name: &'static str, size: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| {
                let receiver = receiver.clone();
                tokio::spawn(async move {
                    loop {
                        let job = receiver.lock().await.recv().await;
                        let Some(job) = job else { break };

                        // A panicking job must not take the worker down with it
                        if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                            error!(pool = name, worker = id, "job panicked");
                        }
                    }
                })
            })
            .collect();

        Self {
            name,
            size,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queues a job. Fails once the pool is shut down; the job is dropped.
    pub fn submit(&self, job: Job) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        match sender.as_ref() {
            Some(sender) => sender.send(job).map_err(|_| CrawlError::ShutDown),
            None => Err(CrawlError::ShutDown),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    /// Stops accepting jobs and aborts every worker. Safe to call twice.
    pub fn shutdown(&self) {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(|e| e.into_inner()));
        for worker in workers {
            worker.abort();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
