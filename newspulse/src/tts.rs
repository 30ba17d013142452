use anyhow::{Context, Result};
use common::TtsConfig;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Longest text the translate endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

const DELIMITERS: &[char] = &['।', '.', '!', '?', ',', ';', ':', '\n'];

/// Turns text into MP3 audio.
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>>;
}

/// Google Translate's public TTS endpoint, the same one gTTS talks to.
pub struct GoogleTts {
    endpoint: String,
    client: Client,
}

impl GoogleTts {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { endpoint: endpoint.into(), client })
    }

    pub fn from_config(cfg: &TtsConfig) -> Result<Self> {
        Self::new(cfg.endpoint.clone(), cfg.timeout_seconds)
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("no text to speak");
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", lang),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await
                .context("TTS HTTP request failed")?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("TTS request for chunk {} failed with status: {}", idx, status);
            }
            let bytes = response.bytes().await.context("failed to read TTS audio")?;
            debug!("tts: chunk {}/{} -> {} bytes", idx, total, bytes.len());
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}

/// Split on sentence punctuation, break long pieces at whitespace (or
/// anywhere for a single overlong word), then pack neighbours back together
/// while they fit in `max_chars`.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if DELIMITERS.contains(&c) {
            segments.push(std::mem::take(&mut current));
        }
    }
    segments.push(current);

    let mut pieces = Vec::new();
    for segment in segments {
        let segment = segment.split_whitespace().collect::<Vec<_>>().join(" ");
        if segment.is_empty() {
            continue;
        }
        if segment.chars().count() <= max_chars {
            pieces.push(segment);
            continue;
        }
        for word in segment.split(' ') {
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                pieces.push(part.iter().collect());
            }
        }
    }

    let mut chunks: Vec<String> = Vec::new();
    for piece in pieces {
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => chunks.push(piece),
        }
    }
    chunks
}

/// Speak `text` and save the audio at `path`.
pub async fn generate_tts(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    lang: &str,
    path: &Path,
) -> Result<PathBuf> {
    let audio = synthesizer.synthesize(text, lang).await?;
    tokio::fs::write(path, &audio)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Saved {} bytes of {} audio to '{}'", audio.len(), lang, path.display());
    Ok(path.to_path_buf())
}
