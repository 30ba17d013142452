//! Pretrained transformer NER (CoNLL-03 BERT), enabled with `--features bert-ner`.
//! Model weights are downloaded on first use.

use anyhow::{anyhow, Result};
use rust_bert::pipelines::ner::NERModel;
use std::sync::Mutex;
use tracing::info;

use super::{Entity, EntityLabel, EntityRecognizer};

pub struct BertRecognizer {
    model: Mutex<NERModel>,
}

impl BertRecognizer {
    pub fn new() -> Result<Self> {
        info!("loading pretrained NER model");
        let model = NERModel::new(Default::default())?;
        Ok(Self { model: Mutex::new(model) })
    }
}

fn map_label(label: &str) -> EntityLabel {
    // Full-entity labels may still carry a BIO prefix depending on the model.
    match label.rsplit('-').next().unwrap_or(label) {
        "ORG" => EntityLabel::Org,
        "LOC" => EntityLabel::Gpe,
        "PER" => EntityLabel::Person,
        _ => EntityLabel::Other,
    }
}

impl EntityRecognizer for BertRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let model = self.model.lock().map_err(|_| anyhow!("NER model lock poisoned"))?;
        let output = model.predict_full_entities(&[text]);
        Ok(output
            .into_iter()
            .flatten()
            .map(|e| Entity { label: map_label(&e.label), text: e.word })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_conll_labels() {
        assert_eq!(map_label("I-ORG"), EntityLabel::Org);
        assert_eq!(map_label("LOC"), EntityLabel::Gpe);
        assert_eq!(map_label("B-PER"), EntityLabel::Person);
        assert_eq!(map_label("MISC"), EntityLabel::Other);
    }
}
