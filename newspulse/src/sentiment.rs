use serde::{Deserialize, Serialize};
use std::fmt;

/// Compound score at or above which text counts as positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which text counts as negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a normalized compound polarity score in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// VADER lexicon and rule based scorer.
pub struct VaderScorer {
    analyzer: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Map a compound score onto a label. NaN is neither above nor below a
/// threshold and therefore neutral.
pub fn classify(compound: f64) -> Sentiment {
    if compound >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Score and label a piece of (already cleaned) text. Empty text is neutral
/// with a zero score and is never sent to the scorer.
pub fn score_text(scorer: &dyn SentimentScorer, text: &str) -> (Sentiment, f64) {
    if text.is_empty() {
        return (Sentiment::Neutral, 0.0);
    }
    let compound = scorer.compound(text);
    (classify(compound), compound)
}

/// Label for an optional cell; missing or empty text is neutral.
pub fn get_sentiment(scorer: &dyn SentimentScorer, text: Option<&str>) -> Sentiment {
    score_text(scorer, text.unwrap_or_default()).0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl SentimentScorer for Fixed {
        fn compound(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(0.05), Sentiment::Positive);
        assert_eq!(classify(-0.05), Sentiment::Negative);
        assert_eq!(classify(0.0499), Sentiment::Neutral);
        assert_eq!(classify(-0.0499), Sentiment::Neutral);
        assert_eq!(classify(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn classification_is_monotonic() {
        let rank = |s: Sentiment| match s {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        };
        let mut previous = 0;
        for step in -100..=100 {
            let r = rank(classify(step as f64 / 100.0));
            assert!(r >= previous, "label went down at {}", step);
            previous = r;
        }
    }

    #[test]
    fn empty_text_skips_the_scorer() {
        assert_eq!(score_text(&Fixed(0.9), ""), (Sentiment::Neutral, 0.0));
        assert_eq!(score_text(&Fixed(0.9), "great").0, Sentiment::Positive);
        assert_eq!(get_sentiment(&Fixed(-0.9), None), Sentiment::Neutral);
        assert_eq!(get_sentiment(&Fixed(-0.9), Some("bad")), Sentiment::Negative);
    }

    #[test]
    fn vader_scores_obvious_polarity() {
        let vader = VaderScorer::new();
        assert_eq!(score_text(&vader, "great excellent profit").0, Sentiment::Positive);
        assert_eq!(score_text(&vader, "terrible lawsuit disaster").0, Sentiment::Negative);
        assert_eq!(score_text(&vader, "company announce quarterly report").0, Sentiment::Neutral);
    }

    #[test]
    fn serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Sentiment::Positive).unwrap(), "\"Positive\"");
        assert_eq!(Sentiment::Negative.to_string(), "Negative");
    }
}
