//! Report document and the Hindi summary texts derived from it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::compare::{CoverageDifference, SentimentDistribution, TopicOverlap};
use crate::sentiment::Sentiment;

/// A sentiment score that never produces a non-finite JSON literal: NaN and
/// infinities are written as the strings `"nan"`, `"inf"` and `"-inf"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score(pub f64);

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() {
            serializer.serialize_f64(v)
        } else if v.is_nan() {
            serializer.serialize_str("nan")
        } else if v > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Score(v)),
            Raw::Text(s) => s
                .parse::<f64>()
                .map(Score)
                .map_err(|_| serde::de::Error::custom(format!("invalid score {:?}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportArticle {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Summary")]
    pub summary: Option<String>,
    /// Sentiment of the cleaned title
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    /// Compound score behind `sentiment`
    #[serde(rename = "Score")]
    pub score: Score,
    #[serde(rename = "Topics")]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeSentiment {
    #[serde(rename = "Sentiment Distribution")]
    pub distribution: SentimentDistribution,
    #[serde(rename = "Coverage Differences")]
    pub coverage_differences: Vec<CoverageDifference>,
    #[serde(rename = "Topic Overlap")]
    pub topic_overlap: TopicOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Articles")]
    pub articles: Vec<ReportArticle>,
    #[serde(rename = "Comparative Sentiment Score")]
    pub comparative: ComparativeSentiment,
    #[serde(rename = "Overall Sentiment")]
    pub overall: Sentiment,
    #[serde(rename = "Final Sentiment Analysis")]
    pub final_analysis: String,
    #[serde(rename = "Audio")]
    pub audio: String,
}

pub fn overall_sentiment(dist: &SentimentDistribution) -> Sentiment {
    dist.overall()
}

/// One-paragraph verdict in Hindi. Ties, including no coverage at all, read
/// as mixed signals.
pub fn final_sentiment_summary(company: &str, dist: &SentimentDistribution) -> String {
    match overall_sentiment(dist) {
        Sentiment::Positive => format!(
            "{} की नवीनतम समाचार कवरेज मुख्यतः सकारात्मक है। स्टॉक वृद्धि की संभावना है।",
            company
        ),
        Sentiment::Negative => format!(
            "{} की नवीनतम समाचार कवरेज में कुछ नकारात्मक संकेत मिले हैं। निवेशकों को सतर्क रहना चाहिए।",
            company
        ),
        Sentiment::Neutral => format!(
            "{} की समाचार कवरेज में मिश्रित संकेत हैं। सकारात्मक और नकारात्मक दोनों पक्षों पर ध्यान दें।",
            company
        ),
    }
}

/// Text read out in the audio summary.
pub fn speech_script(company: &str, dist: &SentimentDistribution, final_summary: &str) -> String {
    [
        format!("नमस्ते, यह {} के नवीनतम समाचार की भावना विश्लेषण रिपोर्ट है।", company),
        format!("कुल सकारात्मक लेख: {}", dist.positive),
        format!("कुल नकारात्मक लेख: {}", dist.negative),
        format!("तटस्थ लेख: {}", dist.neutral),
        format!("अंतिम विश्लेषण: {}", final_summary),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report(score: f64) -> Report {
        Report {
            company: "Acme".to_string(),
            articles: vec![ReportArticle {
                title: Some("Acme rises".to_string()),
                summary: None,
                sentiment: Sentiment::Neutral,
                score: Score(score),
                topics: vec![],
            }],
            comparative: ComparativeSentiment {
                distribution: SentimentDistribution::default(),
                coverage_differences: vec![],
                topic_overlap: TopicOverlap::default(),
            },
            overall: Sentiment::Neutral,
            final_analysis: String::new(),
            audio: "output/Acme_sentiment_summary_hindi.mp3".to_string(),
        }
    }

    #[test]
    fn summary_follows_the_majority() {
        let pos = SentimentDistribution { positive: 3, negative: 1, neutral: 0 };
        let neg = SentimentDistribution { positive: 0, negative: 2, neutral: 5 };
        assert!(final_sentiment_summary("Acme", &pos).contains("सकारात्मक है"));
        assert!(final_sentiment_summary("Acme", &neg).contains("नकारात्मक संकेत"));
        assert!(final_sentiment_summary("Acme", &SentimentDistribution::default()).contains("मिश्रित"));
    }

    #[test]
    fn script_lists_counts() {
        let dist = SentimentDistribution { positive: 4, negative: 2, neutral: 1 };
        let script = speech_script("Acme", &dist, "FINAL");
        let lines: Vec<_> = script.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Acme"));
        assert_eq!(lines[1], "कुल सकारात्मक लेख: 4");
        assert_eq!(lines[4], "अंतिम विश्लेषण: FINAL");
    }

    #[test]
    fn report_uses_display_keys() {
        let value = serde_json::to_value(empty_report(0.25)).unwrap();
        assert_eq!(value["Company"], "Acme");
        assert_eq!(value["Articles"][0]["Score"], 0.25);
        assert!(value["Articles"][0]["Summary"].is_null());
        assert_eq!(value["Comparative Sentiment Score"]["Sentiment Distribution"]["Neutral"], 0);
        assert_eq!(value["Overall Sentiment"], "Neutral");
    }

    #[test]
    fn non_finite_scores_round_trip_as_strings() {
        for (v, literal) in [(f64::NAN, "nan"), (f64::INFINITY, "inf"), (f64::NEG_INFINITY, "-inf")] {
            let json = serde_json::to_string(&empty_report(v)).unwrap();
            assert!(json.contains(&format!("\"Score\":\"{}\"", literal)));
            assert!(!json.contains("NaN") && !json.contains("Infinity"));

            let back: Report = serde_json::from_str(&json).unwrap();
            let score = back.articles[0].score.0;
            assert_eq!(score.is_nan(), v.is_nan());
            if !v.is_nan() {
                assert_eq!(score, v);
            }
        }
    }
}
