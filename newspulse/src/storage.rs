use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ingestion::ArticleRecord;
use crate::report::Report;

const CSV_HEADER: [&str; 5] = ["Title", "Summary", "Link", "Published", "Source"];

/// Company name made safe for use in a file name. Characters that are not
/// alphanumeric, space, `-`, `_` or `.` become `_`; a name that is only dots
/// is replaced entirely.
pub fn file_stem(company: &str) -> String {
    let stem: String = company
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') { c } else { '_' })
        .collect();
    if stem.chars().all(|c| c == '.') {
        "_".repeat(stem.len().max(1))
    } else {
        stem
    }
}

pub fn articles_csv_path(data_dir: &Path, company: &str) -> PathBuf {
    data_dir.join(format!("{}_news.csv", file_stem(company)))
}

pub fn report_path(output_dir: &Path, company: &str) -> PathBuf {
    output_dir.join(format!("{}_comparative_sentiment_report.json", file_stem(company)))
}

pub fn audio_path(output_dir: &Path, company: &str) -> PathBuf {
    output_dir.join(format!("{}_sentiment_summary_hindi.mp3", file_stem(company)))
}

/// Writes the raw article table. The header is always written, so a run
/// without matches still leaves a readable (empty) table behind.
pub async fn write_articles_csv(path: &Path, articles: &[ArticleRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(CSV_HEADER).context("failed to write CSV header")?;
    for article in articles {
        wtr.serialize(article).context("failed to serialize article row")?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;

    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    if articles.is_empty() {
        warn!("No articles found; wrote empty table to '{}'", path.display());
    } else {
        info!("Saved {} articles in '{}'", articles.len(), path.display());
    }
    Ok(())
}

pub async fn read_articles_csv(path: &Path) -> Result<Vec<ArticleRecord>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    rdr.deserialize()
        .collect::<Result<Vec<ArticleRecord>, _>>()
        .with_context(|| format!("malformed article table {}", path.display()))
}

/// Pretty-printed report; non-ASCII text is written as-is.
pub async fn write_report(path: &Path, report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Final report saved to '{}'", path.display());
    Ok(())
}

pub async fn read_report_value(path: &Path) -> Result<serde_json::Value> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("malformed report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, summary: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            summary: summary.to_string(),
            link: "https://x.test/a".to_string(),
            published: String::new(),
            source: "https://x.test/rss".to_string(),
        }
    }

    #[test]
    fn stems_replace_path_separators() {
        assert_eq!(file_stem("Tesla"), "Tesla");
        assert_eq!(file_stem(" AT&T / Verizon "), "AT_T _ Verizon");
        assert_eq!(file_stem("../etc"), ".._etc");
        assert_eq!(file_stem(".."), "__");
    }

    #[test]
    fn paths_are_company_keyed() {
        let dir = Path::new("out");
        assert_eq!(report_path(dir, "Apple"), Path::new("out/Apple_comparative_sentiment_report.json"));
        assert_eq!(audio_path(dir, "Apple"), Path::new("out/Apple_sentiment_summary_hindi.mp3"));
        assert_eq!(articles_csv_path(dir, "Apple"), Path::new("out/Apple_news.csv"));
    }

    #[tokio::test]
    async fn csv_round_trip_keeps_quotes_and_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let rows = vec![
            record("Apple, \"the\" company", "line one\nline two"),
            record("No summary", ""),
        ];

        write_articles_csv(&path, &rows).await.unwrap();
        let back = read_articles_csv(&path).await.unwrap();
        assert_eq!(back, rows);
    }

    #[tokio::test]
    async fn empty_table_still_has_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_articles_csv(&path, &[]).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim_end(), "Title,Summary,Link,Published,Source");
        assert!(read_articles_csv(&path).await.unwrap().is_empty());
    }
}
