// src/config.rs
// =============================================================================
// Configuration for the crawler and for the shipped HTTP downloader.
//
// CrawlerConfig sizes the two worker pools and the per-host download limit.
// Every value must be at least 1: a per-host limit of 0 would make every
// download wait forever, so it is rejected here instead of in the engine.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("the crawler must be created inside a Tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Number of download workers
    pub downloaders: usize,
    /// Number of link extraction workers
    pub extractors: usize,
    /// Maximum simultaneous downloads from one host
    pub per_host: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        let parallelism = num_cpus::get();
        Self {
            downloaders: parallelism,
            extractors: parallelism,
            per_host: parallelism,
        }
    }
}

impl CrawlerConfig {
    pub fn new(downloaders: usize, extractors: usize, per_host: usize) -> Self {
        Self {
            downloaders,
            extractors,
            per_host,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.downloaders == 0 {
            return Err(ConfigError::Zero("downloaders"));
        }
        if self.extractors == 0 {
            return Err(ConfigError::Zero("extractors"));
        }
        if self.per_host == 0 {
            return Err(ConfigError::Zero("per_host"));
        }
        Ok(())
    }
}

// Settings for HttpDownloader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: concat!("link-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
