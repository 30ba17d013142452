/*!
common/src/lib.rs

Shared configuration types and filesystem helpers for newspulse.

This file provides:
- Config data structures (deserialized from TOML, every section optional)
- An async loader merging a defaults file with an override file
- A helper that creates the data and output directories
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Business and technology feeds scanned for every company.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://rss.nytimes.com/services/xml/rss/nyt/Business.xml",
    "https://feeds.bbci.co.uk/news/business/rss.xml",
    "https://www.theverge.com/rss/index.xml",
    "https://feeds.marketwatch.com/marketwatch/topstories/",
    "https://feeds.reuters.com/reuters/businessNews",
    "https://www.cnbc.com/id/10001147/device/rss/rss.html",
    "https://arstechnica.com/feed/",
    "https://www.techradar.com/rss",
    "https://www.wired.com/feed/rss",
    "https://mashable.com/feeds/rss",
    "https://venturebeat.com/feed/",
    "https://finance.yahoo.com/rss/topstories",
    "https://www.investopedia.com/feedbuilder/feed/getfeed/?feedName=rss_articles",
    "https://www.autoblog.com/rss.xml",
    "https://www.carscoops.com/feed/",
    "https://www.motortrend.com/feed/",
    "https://news.crunchbase.com/feed/",
    "https://venturebeat.com/category/startups/feed/",
    "https://www.saastr.com/feed/",
    "https://www.artificialintelligence-news.com/feed/",
    "https://openai.com/feed/",
];

/// Google News search feed; `{query}` is replaced by the company name.
pub const DEFAULT_GOOGLE_NEWS_TEMPLATE: &str =
    "https://news.google.com/rss/search?q={query}&hl=en-US&gl=US&ceid=US:en";

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory receiving the per-company CSV of raw articles
    pub data_dir: PathBuf,
    /// Directory receiving JSON reports and MP3 summaries
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Which feeds to scan and how many matches to keep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub urls: Vec<String>,
    /// Appended after `urls`; disabled when `None`
    pub google_news_template: Option<String>,
    pub max_articles: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_FEEDS.iter().map(|u| u.to_string()).collect(),
            google_news_template: Some(DEFAULT_GOOGLE_NEWS_TEMPLATE.to_string()),
            max_articles: 30,
        }
    }
}

/// Feed fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "Newspulse/0.1.0".to_string(),
        }
    }
}

/// Speech synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub endpoint: String,
    pub lang: String,
    pub timeout_seconds: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            lang: "hi".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Values used when building the client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base of the audio download URL handed to clients
    pub public_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub feeds: FeedsConfig,
    pub fetch: FetchConfig,
    pub tts: TtsConfig,
    pub service: ServiceConfig,
    /// Extra or replacement keyword lists, keyed by lowercase company name
    pub keywords: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence). Missing files
    /// are skipped, so with neither present the built-in defaults are returned.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                tracing::debug!(path = %path.display(), "config file absent, skipping");
                continue;
            }
            let data = tokio::fs::read_to_string(path).await
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Create the data and output directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.paths.data_dir, &self.paths.output_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
