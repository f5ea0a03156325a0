// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   link-crawler <seed> [depth [downloads [extractors [per_host]]]]
//
// Numbers that are left out default to the machine's available parallelism
// (depth defaults to 1). clap rejects anything that isn't a positive integer
// with a usage message on stderr.
// =============================================================================

use clap::Parser;
use link_crawler::{CrawlerConfig, HttpConfig};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Recursively download a website with bounded parallelism",
    long_about = "link-crawler downloads every page reachable from a seed URL within a given \
                  number of link hops. Each page is downloaded at most once; total downloads, \
                  link extraction and downloads per host each run with a fixed parallelism."
)]
pub struct Cli {
    /// URL to start crawling from
    pub seed: String,

    /// Maximum crawl depth (1 = just the seed page)
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub depth: Option<u64>,

    /// Number of concurrent downloads
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub downloads: Option<u64>,

    /// Number of concurrent link extractors
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub extractors: Option<u64>,

    /// Maximum concurrent downloads from one host
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub per_host: Option<u64>,

    /// Print the result as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl Cli {
    pub fn max_depth(&self) -> usize {
        self.depth.unwrap_or(1) as usize
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        let defaults = CrawlerConfig::default();
        CrawlerConfig::new(
            self.downloads.map_or(defaults.downloaders, |n| n as usize),
            self.extractors.map_or(defaults.extractors, |n| n as usize),
            self.per_host.map_or(defaults.per_host, |n| n as usize),
        )
    }

    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig {
            timeout: Duration::from_secs(self.timeout),
            ..HttpConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}
