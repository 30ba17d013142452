//! Cross-article comparison: sentiment counts, coverage differences between
//! neighbouring articles and topic overlap.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::report::ReportArticle;
use crate::sentiment::Sentiment;

const EXCERPT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_labels<I: IntoIterator<Item = Sentiment>>(labels: I) -> Self {
        let mut dist = Self::default();
        for label in labels {
            match label {
                Sentiment::Positive => dist.positive += 1,
                Sentiment::Negative => dist.negative += 1,
                Sentiment::Neutral => dist.neutral += 1,
            }
        }
        dist
    }

    /// Positive or negative when one side outnumbers the other, otherwise neutral.
    pub fn overall(&self) -> Sentiment {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDifference {
    #[serde(rename = "Comparison")]
    pub comparison: String,
    #[serde(rename = "Impact")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicOverlap {
    #[serde(rename = "Common Topics")]
    pub common_topics: Vec<String>,
    #[serde(rename = "Unique Topics")]
    pub unique_topics: Vec<Vec<String>>,
}

pub fn sentiment_distribution(articles: &[ReportArticle]) -> SentimentDistribution {
    SentimentDistribution::from_labels(articles.iter().map(|a| a.sentiment))
}

/// Topics shared by every article, and what each article adds on top.
pub fn topic_overlap(articles: &[ReportArticle]) -> TopicOverlap {
    let sets: Vec<BTreeSet<&str>> = articles
        .iter()
        .map(|a| a.topics.iter().map(String::as_str).collect())
        .collect();

    let common: BTreeSet<&str> = match sets.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(first.clone(), |acc, s| acc.intersection(s).copied().collect()),
        None => BTreeSet::new(),
    };

    TopicOverlap {
        common_topics: common.iter().map(|t| t.to_string()).collect(),
        unique_topics: sets
            .iter()
            .map(|s| s.difference(&common).map(|t| t.to_string()).collect())
            .collect(),
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

/// One entry per adjacent pair of articles. Pairs where either summary is
/// missing are skipped.
pub fn coverage_differences(articles: &[ReportArticle]) -> Vec<CoverageDifference> {
    articles
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let (a, b) = (&pair[0], &pair[1]);
            let (sa, sb) = (a.summary.as_deref()?, b.summary.as_deref()?);
            Some(CoverageDifference {
                comparison: format!(
                    "Article {} highlights {}... while Article {} discusses {}...",
                    i + 1,
                    excerpt(sa),
                    i + 2,
                    excerpt(sb)
                ),
                impact: format!(
                    "The first article emphasizes {} sentiment, while the second article reflects {} sentiment.",
                    a.sentiment.as_str().to_lowercase(),
                    b.sentiment.as_str().to_lowercase()
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Score;

    fn article(summary: Option<&str>, sentiment: Sentiment, topics: &[&str]) -> ReportArticle {
        ReportArticle {
            title: Some("t".to_string()),
            summary: summary.map(str::to_string),
            sentiment,
            score: Score(0.0),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn distribution_and_overall() {
        let arts = vec![
            article(None, Sentiment::Positive, &[]),
            article(None, Sentiment::Positive, &[]),
            article(None, Sentiment::Negative, &[]),
            article(None, Sentiment::Neutral, &[]),
        ];
        let dist = sentiment_distribution(&arts);
        assert_eq!(dist, SentimentDistribution { positive: 2, negative: 1, neutral: 1 });
        assert_eq!(dist.overall(), Sentiment::Positive);
        assert_eq!(SentimentDistribution::default().overall(), Sentiment::Neutral);
    }

    #[test]
    fn overlap_splits_common_and_unique() {
        let arts = vec![
            article(None, Sentiment::Neutral, &["Tesla", "China", "BYD"]),
            article(None, Sentiment::Neutral, &["Tesla", "Texas"]),
        ];
        let overlap = topic_overlap(&arts);
        assert_eq!(overlap.common_topics, vec!["Tesla"]);
        assert_eq!(overlap.unique_topics, vec![vec!["BYD", "China"], vec!["Texas"]]);
    }

    #[test]
    fn overlap_of_nothing_is_empty() {
        assert_eq!(topic_overlap(&[]), TopicOverlap::default());

        let single = topic_overlap(&[article(None, Sentiment::Neutral, &["Apple"])]);
        assert_eq!(single.common_topics, vec!["Apple"]);
        assert_eq!(single.unique_topics, vec![Vec::<String>::new()]);
    }

    #[test]
    fn differences_compare_neighbours() {
        let long = "x".repeat(80);
        let arts = vec![
            article(Some(&long), Sentiment::Positive, &[]),
            article(Some("Short one"), Sentiment::Negative, &[]),
            article(None, Sentiment::Neutral, &[]),
            article(Some("Fourth"), Sentiment::Neutral, &[]),
        ];
        let diffs = coverage_differences(&arts);

        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].comparison,
            format!("Article 1 highlights {}... while Article 2 discusses Short one...", "x".repeat(50))
        );
        assert_eq!(
            diffs[0].impact,
            "The first article emphasizes positive sentiment, while the second article reflects negative sentiment."
        );
    }

    #[test]
    fn excerpts_count_characters_not_bytes() {
        let hindi = "स".repeat(60);
        assert_eq!(excerpt(&hindi).chars().count(), 50);
    }

    #[test]
    fn fewer_than_two_articles_have_no_differences() {
        assert!(coverage_differences(&[]).is_empty());
        assert!(coverage_differences(&[article(Some("a"), Sentiment::Neutral, &[])]).is_empty());
    }
}
