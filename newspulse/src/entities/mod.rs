//! Named entity recognition used to derive article topics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod gazetteer;
#[cfg(feature = "bert-ner")]
pub mod bert;

pub use gazetteer::GazetteerRecognizer;

/// Entity categories, named after the OntoNotes labels they correspond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Org,
    Product,
    Gpe,
    Event,
    Person,
    Other,
}

impl EntityLabel {
    /// Labels that count as an article topic.
    pub fn is_topic(&self) -> bool {
        matches!(self, EntityLabel::Org | EntityLabel::Product | EntityLabel::Gpe | EntityLabel::Event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Finds entity mentions in raw (uncleaned) text.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> anyhow::Result<Vec<Entity>>;
}

/// Distinct organisation, product, place and event mentions in `text`.
pub fn extract_topics(recognizer: &dyn EntityRecognizer, text: Option<&str>) -> anyhow::Result<BTreeSet<String>> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return Ok(BTreeSet::new());
    };

    Ok(recognizer
        .recognize(text)?
        .into_iter()
        .filter(|e| e.label.is_topic())
        .map(|e| e.text)
        .collect())
}
