use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::info;

/// Curated keyword lists for companies we know something about.
const PREDEFINED: &[(&str, &[&str])] = &[
    ("tesla", &["tesla", "elon musk", "tesla model", "tesla stock", "gigafactory"]),
    ("apple", &["apple", "tim cook", "iphone", "apple stock", "macbook"]),
    ("microsoft", &["microsoft", "satya nadella", "windows", "microsoft azure", "msft stock"]),
    ("google", &["google", "sundar pichai", "google search", "google stock", "android"]),
    ("amazon", &["amazon", "jeff bezos", "aws", "amazon prime", "amazon stock"]),
    ("nvidia", &["nvidia", "gpu", "rtx", "nvidia stock", "ai chips"]),
];

/// Built-in keyword table, optionally extended (or overridden) by config entries.
pub fn keyword_table(extra: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    let mut table: BTreeMap<String, Vec<String>> = PREDEFINED
        .iter()
        .map(|(name, words)| (name.to_string(), words.iter().map(|w| w.to_string()).collect()))
        .collect();
    for (name, words) in extra {
        table.insert(name.to_lowercase(), words.clone());
    }
    table
}

/// Search keywords for a company: the curated list when the name is known
/// (case-insensitive), otherwise a set derived from the name itself.
pub fn generate_search_keywords(company: &str, table: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    if let Some(words) = table.get(&company.to_lowercase()) {
        info!(company, ?words, "using predefined keywords");
        return words.clone();
    }

    info!(company, "using generated keywords");
    let mut words = vec![company.to_string()];
    words.extend(
        ["CEO", "news", "updates", "stock", "model", "launch"]
            .iter()
            .map(|suffix| format!("{} {}", company, suffix)),
    );
    words
}

/// Keywords for `company` straight from the configured extras, without
/// building anything else.
pub fn keywords_for_company(extra: &BTreeMap<String, Vec<String>>, company: &str) -> Vec<String> {
    generate_search_keywords(company.trim(), &keyword_table(extra))
}

/// Whole-word matcher over a keyword list. Text is lowercased before matching.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let patterns = keywords
            .iter()
            .map(|k| {
                let k = k.as_ref().to_lowercase();
                Regex::new(&format!(r"\b{}\b", regex::escape(&k)))
                    .with_context(|| format!("invalid keyword pattern for {:?}", k))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_match(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.patterns.iter().any(|p| p.is_match(&lowered))
    }
}
