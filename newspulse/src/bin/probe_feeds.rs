//! Fetches every configured feed once and prints what came back.
//! Useful for spotting dead or reshaped feeds before a real run.

use anyhow::Result;
use common::Config;
use std::path::{Path, PathBuf};

use newspulse::ingestion::{build_client, feed_urls, fetch_and_parse_feed};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let company = std::env::args().nth(1).unwrap_or_else(|| "Tesla".to_string());
    let config = Config::load_with_defaults(
        Some(Path::new("config.default.toml")),
        Some(&PathBuf::from("config.toml")),
    )
    .await?;
    let client = build_client(&config.fetch)?;

    let mut failed = 0;
    for url in feed_urls(&config.feeds, &company) {
        println!("\n{}", "=".repeat(60));
        println!("Testing: {}", url);
        println!("{}", "=".repeat(60));

        match fetch_and_parse_feed(&client, &url).await {
            Ok(feed) => {
                println!("✓ Success!");
                println!("  Title: {:?}", feed.title.as_ref().map(|t| &t.content));
                println!("  Entries: {}", feed.entries.len());

                for (i, entry) in feed.entries.iter().take(3).enumerate() {
                    println!("    {}. {:?}", i + 1, entry.title.as_ref().map(|t| &t.content));
                    println!("       URL: {}", entry.links.first().map(|l| l.href.as_str()).unwrap_or("none"));
                    let summary_len = entry.summary.as_ref().map(|s| s.content.len()).unwrap_or(0);
                    println!("       Summary: {} chars, published: {:?}", summary_len, entry.published);
                }
            }
            Err(e) => {
                failed += 1;
                println!("✗ Failed: {:#}", e);
            }
        }
    }

    println!("\n{} feed(s) failed", failed);
    Ok(())
}
