use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::{FeedsConfig, FetchConfig};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::keywords::KeywordMatcher;
use crate::text::strip_html;

/// One matching feed entry, as persisted to the per-company CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Published")]
    pub published: String,
    #[serde(rename = "Source")]
    pub source: String,
}

pub fn build_client(cfg: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_seconds))
        .user_agent(cfg.user_agent.as_str())
        .build()
        .context("failed to build reqwest client")
}

/// Google News search feed for `company`, spaces encoded as `+`.
pub fn google_news_url(template: &str, company: &str) -> String {
    let query: String = url::form_urlencoded::byte_serialize(company.as_bytes()).collect();
    template.replace("{query}", &query)
}

/// Configured feeds followed by the company's Google News search feed.
pub fn feed_urls(cfg: &FeedsConfig, company: &str) -> Vec<String> {
    let mut urls = cfg.urls.clone();
    if let Some(template) = &cfg.google_news_template {
        urls.push(google_news_url(template, company));
    }
    urls
}

/// Fetches a feed from the given URL and parses it. A single attempt; the
/// client's timeout bounds it.
pub async fn fetch_and_parse_feed(client: &Client, url: &str) -> Result<Feed> {
    let response = client.get(url).send().await.context("network error during fetch")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("feed fetch failed with status: {}", status);
    }

    let bytes = response.bytes().await.context("failed to read response body")?;
    let feed = parser::parse(bytes.as_ref()).context("failed to parse feed")?;
    Ok(feed)
}

/// RFC 2822 rendering used in the article table.
fn format_published(date: DateTime<Utc>) -> String {
    date.to_rfc2822()
}

fn entry_summary(entry: &Entry) -> String {
    entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default()
}

/// Appends the entries of one parsed feed that mention a keyword. Titles
/// already in `seen` are skipped; nothing is added once `max_articles` is
/// reached.
pub fn collect_matching(
    source: &str,
    entries: &[Entry],
    matcher: &KeywordMatcher,
    seen: &mut HashSet<String>,
    articles: &mut Vec<ArticleRecord>,
    max_articles: usize,
) {
    for entry in entries {
        if articles.len() >= max_articles {
            break;
        }

        let title = entry.title.as_ref().map(|t| t.content.trim().to_string()).unwrap_or_default();
        if seen.contains(&title) {
            debug!("skipping duplicate title: {:?}", title);
            continue;
        }

        let summary = strip_html(entry_summary(entry).trim());
        if !matcher.is_match(&title) && !matcher.is_match(&summary) {
            continue;
        }

        let link = entry.links.first().map(|l| l.href.trim().to_string()).unwrap_or_default();
        let published = entry.published.map(format_published).unwrap_or_default();

        seen.insert(title.clone());
        articles.push(ArticleRecord {
            title,
            summary,
            link,
            published,
            source: source.to_string(),
        });
    }
}

/// Walks `feeds` in order collecting keyword matches until `max_articles`
/// are found. A feed that fails to download or parse is logged and skipped.
pub async fn extract_news(
    client: &Client,
    feeds: &[String],
    matcher: &KeywordMatcher,
    max_articles: usize,
) -> Vec<ArticleRecord> {
    let mut articles = Vec::new();
    let mut seen = HashSet::new();

    for url in feeds {
        if articles.len() >= max_articles {
            break;
        }
        match fetch_and_parse_feed(client, url).await {
            Ok(feed) => {
                let before = articles.len();
                collect_matching(url, &feed.entries, matcher, &mut seen, &mut articles, max_articles);
                info!(
                    "Fetched feed '{}': {} entries, {} matched",
                    url,
                    feed.entries.len(),
                    articles.len() - before
                );
            }
            Err(e) => {
                warn!("Error parsing feed {}: {:#}. Skipping...", url, e);
            }
        }
    }

    articles
}
