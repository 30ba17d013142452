//! End-to-end analysis for one company: keywords, feeds, CSV, cleaning,
//! sentiment, topics, comparison, audio summary and the JSON report.

use anyhow::{Context, Result};
use common::Config;
use reqwest::Client;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::compare::{coverage_differences, sentiment_distribution, topic_overlap};
use crate::entities::{extract_topics, EntityLabel, EntityRecognizer, GazetteerRecognizer};
use crate::ingestion::{build_client, extract_news, feed_urls, ArticleRecord};
use crate::keywords::{generate_search_keywords, keyword_table, KeywordMatcher};
use crate::report::{
    final_sentiment_summary, overall_sentiment, speech_script, ComparativeSentiment, Report, ReportArticle, Score,
};
use crate::sentiment::{score_text, Sentiment, SentimentScorer, VaderScorer};
use crate::storage;
use crate::text::clean_and_preprocess;
use crate::tts::{generate_tts, GoogleTts, SpeechSynthesizer};

/// An article row after cleaning, scoring and topic extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedArticle {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub cleaned_title: String,
    pub cleaned_summary: String,
    pub title_sentiment: Sentiment,
    pub summary_sentiment: Sentiment,
    pub title_score: f64,
    pub topics: BTreeSet<String>,
}

impl AnalyzedArticle {
    pub fn to_report_article(&self) -> ReportArticle {
        ReportArticle {
            title: self.title.clone(),
            summary: self.summary.clone(),
            sentiment: self.title_sentiment,
            score: Score(self.title_score),
            topics: self.topics.iter().cloned().collect(),
        }
    }
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

pub struct Pipeline {
    config: Config,
    client: Client,
    keywords: BTreeMap<String, Vec<String>>,
    scorer: Box<dyn SentimentScorer>,
    recognizer: Box<dyn EntityRecognizer>,
    tts: Box<dyn SpeechSynthesizer>,
}

impl Pipeline {
    /// Pipeline with the default scorer, recognizer and speech backend.
    /// Building the transformer recognizer (`bert-ner`) blocks, so call this
    /// off the async executor.
    pub fn new(config: Config) -> Result<Self> {
        let tts = GoogleTts::from_config(&config.tts)?;
        Self::with_components(config, Box::new(VaderScorer::new()), default_recognizer()?, Box::new(tts))
    }

    pub fn with_components(
        config: Config,
        scorer: Box<dyn SentimentScorer>,
        recognizer: Box<dyn EntityRecognizer>,
        tts: Box<dyn SpeechSynthesizer>,
    ) -> Result<Self> {
        let client = build_client(&config.fetch)?;
        let keywords = keyword_table(&config.keywords);
        Ok(Self { config, client, keywords, scorer, recognizer, tts })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn search_keywords(&self, company: &str) -> Vec<String> {
        generate_search_keywords(company, &self.keywords)
    }

    /// Clean, score and tag every row. Topics come from the raw title and
    /// summary, and always include mentions of `company`; sentiment comes
    /// from the cleaned forms.
    pub fn analyze_articles(&self, company: &str, records: &[ArticleRecord]) -> Result<Vec<AnalyzedArticle>> {
        let company_names = GazetteerRecognizer::names_only().with_entry(company.trim(), EntityLabel::Org);

        records
            .iter()
            .map(|record| {
                let title = non_empty(&record.title);
                let summary = non_empty(&record.summary);

                let cleaned_title = clean_and_preprocess(title.as_deref());
                let cleaned_summary = clean_and_preprocess(summary.as_deref());
                let (title_sentiment, title_score) = score_text(self.scorer.as_ref(), &cleaned_title);
                let (summary_sentiment, _) = score_text(self.scorer.as_ref(), &cleaned_summary);

                let mut topics = BTreeSet::new();
                for text in [title.as_deref(), summary.as_deref()] {
                    topics.extend(extract_topics(self.recognizer.as_ref(), text)?);
                    topics.extend(extract_topics(&company_names, text)?);
                }

                Ok(AnalyzedArticle {
                    title,
                    summary,
                    cleaned_title,
                    cleaned_summary,
                    title_sentiment,
                    summary_sentiment,
                    title_score,
                    topics,
                })
            })
            .collect()
    }

    /// Runs every stage for `company` and returns the report and audio paths.
    pub async fn run_pipeline(&self, company: &str) -> Result<(PathBuf, PathBuf)> {
        self.config.ensure_dirs().await?;
        let paths = &self.config.paths;

        info!(company, "[1/7] generating search keywords");
        let keywords = self.search_keywords(company);
        let matcher = KeywordMatcher::new(&keywords)?;

        info!(company, "[2/7] extracting news");
        let feeds = feed_urls(&self.config.feeds, company);
        let records = extract_news(&self.client, &feeds, &matcher, self.config.feeds.max_articles).await;

        let csv_path = storage::articles_csv_path(&paths.data_dir, company);
        storage::write_articles_csv(&csv_path, &records).await?;

        info!(company, "[3/7] cleaning and scoring articles");
        let records = storage::read_articles_csv(&csv_path).await?;
        if records.is_empty() {
            warn!(company, "no matching articles, report will be empty");
        }
        let analyzed = self.analyze_articles(company, &records)?;
        let articles: Vec<ReportArticle> = analyzed.iter().map(AnalyzedArticle::to_report_article).collect();

        info!(company, "[4/7] comparing coverage");
        let distribution = sentiment_distribution(&articles);
        let comparative = ComparativeSentiment {
            distribution,
            coverage_differences: coverage_differences(&articles),
            topic_overlap: topic_overlap(&articles),
        };

        info!(company, "[5/7] writing final analysis");
        let final_analysis = final_sentiment_summary(company, &distribution);
        let script = speech_script(company, &distribution, &final_analysis);

        info!(company, lang = %self.config.tts.lang, "[6/7] synthesizing audio summary");
        let audio_path = storage::audio_path(&paths.output_dir, company);
        generate_tts(self.tts.as_ref(), &script, &self.config.tts.lang, &audio_path)
            .await
            .context("text-to-speech failed")?;

        info!(company, "[7/7] saving report");
        let report = Report {
            company: company.to_string(),
            articles,
            comparative,
            overall: overall_sentiment(&distribution),
            final_analysis,
            audio: audio_path.display().to_string(),
        };
        let report_path = storage::report_path(&paths.output_dir, company);
        storage::write_report(&report_path, &report).await?;

        info!(
            company,
            positive = distribution.positive,
            negative = distribution.negative,
            neutral = distribution.neutral,
            "pipeline finished"
        );
        Ok((report_path, audio_path))
    }
}

#[cfg(not(feature = "bert-ner"))]
fn default_recognizer() -> Result<Box<dyn EntityRecognizer>> {
    Ok(Box::new(GazetteerRecognizer::new()))
}

#[cfg(feature = "bert-ner")]
fn default_recognizer() -> Result<Box<dyn EntityRecognizer>> {
    match crate::entities::bert::BertRecognizer::new() {
        Ok(model) => Ok(Box::new(model)),
        Err(e) => {
            warn!("NER model unavailable ({:#}), using gazetteer recognizer", e);
            Ok(Box::new(GazetteerRecognizer::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Entity, EntityLabel};

    struct WordCount;

    impl SentimentScorer for WordCount {
        fn compound(&self, text: &str) -> f64 {
            if text.contains("good") {
                0.6
            } else if text.contains("bad") {
                -0.6
            } else {
                0.0
            }
        }
    }

    struct Capitals;

    impl EntityRecognizer for Capitals {
        fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
            Ok(text
                .split_whitespace()
                .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
                .map(|w| Entity { text: w.to_string(), label: EntityLabel::Org })
                .collect())
        }
    }

    struct Silent;

    #[async_trait::async_trait]
    impl SpeechSynthesizer for Silent {
        async fn synthesize(&self, _text: &str, _lang: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::with_components(Config::default(), Box::new(WordCount), Box::new(Capitals), Box::new(Silent))
            .unwrap()
    }

    fn record(title: &str, summary: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            summary: summary.to_string(),
            link: String::new(),
            published: String::new(),
            source: String::new(),
        }
    }

    #[test]
    fn rows_are_cleaned_scored_and_tagged() {
        let rows = pipeline()
            .analyze_articles("Acme", &[record("Acme posts good quarters", "Investors in Berlin cheered")])
            .unwrap();
        let row = &rows[0];

        assert_eq!(row.cleaned_title, "acme post good quarter");
        assert_eq!(row.title_sentiment, Sentiment::Positive);
        assert_eq!(row.title_score, 0.6);
        assert_eq!(row.summary_sentiment, Sentiment::Neutral);
        assert_eq!(row.topics.iter().collect::<Vec<_>>(), vec!["Acme", "Berlin", "Investors"]);
    }

    #[test]
    fn empty_cells_are_missing() {
        let rows = pipeline().analyze_articles("Acme", &[record("Bad day", "")]).unwrap();
        let article = rows[0].to_report_article();

        assert_eq!(article.summary, None);
        assert_eq!(article.sentiment, Sentiment::Negative);
        assert_eq!(rows[0].cleaned_summary, "");
        assert_eq!(rows[0].summary_sentiment, Sentiment::Neutral);
    }

    struct Nothing;

    impl EntityRecognizer for Nothing {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn analysed_company_is_always_a_topic() {
        let p = Pipeline::with_components(Config::default(), Box::new(WordCount), Box::new(Nothing), Box::new(Silent))
            .unwrap();
        let rows = p
            .analyze_articles(
                " zomato ",
                &[
                    record("Zomato shares jump after strong quarter", ""),
                    record("Delivery apps slow down", "Analysts still like Zomato."),
                    record("Unrelated headline", "Nothing here"),
                ],
            )
            .unwrap();

        assert_eq!(rows[0].topics.iter().collect::<Vec<_>>(), vec!["Zomato"]);
        assert_eq!(rows[1].topics.iter().collect::<Vec<_>>(), vec!["Zomato"]);
        assert!(rows[2].topics.is_empty());
    }

    #[test]
    fn configured_keywords_override_builtins() {
        let mut config = Config::default();
        config.keywords.insert("Tesla".to_string(), vec!["cybertruck".to_string()]);
        let p = Pipeline::with_components(config, Box::new(WordCount), Box::new(Capitals), Box::new(Silent)).unwrap();

        assert_eq!(p.search_keywords("TESLA"), vec!["cybertruck"]);
        assert_eq!(p.search_keywords("Acme")[0], "Acme");
    }
}
