// src/main.rs
// =============================================================================
// Entry point of the link-crawler CLI.
//
// What happens here:
// 1. Set up logging (RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the HTTP downloader and the crawler, run one crawl
// 4. Print the downloaded pages, then the errors
// 5. Exit with proper code (0 = no errors, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use link_crawler::{CrawlResult, HttpDownloader, WebCrawler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "link_crawler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every page downloaded
//   Ok(1) = some pages failed
//   Err = could not run the crawl at all
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let downloader =
        HttpDownloader::new(&cli.http_config()).context("failed to create HTTP client")?;
    let crawler = WebCrawler::new(downloader, cli.crawler_config())
        .context("invalid crawler configuration")?;

    let result = crawler.crawl(&cli.seed, cli.max_depth()).await;
    crawler.shutdown();

    print_result(&result, cli.json)?;

    Ok(if result.is_ok() { 0 } else { 1 })
}

fn print_result(result: &CrawlResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("Downloaded:");
    for url in &result.downloaded {
        println!("{}", url);
    }

    println!("Errors:");
    for (url, error) in &result.errors {
        println!("{}: {}", url, error);
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Downloaded: {}", result.downloaded.len());
    println!("   ❌ Failed: {}", result.errors.len());
    println!("   📋 Total: {}", result.total());
    Ok(())
}
