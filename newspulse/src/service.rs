//! Request handling behind the analyze, download and health endpoints,
//! independent of any HTTP framework.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::pipeline::Pipeline;

pub const HEALTH_MESSAGE: &str = "News Summarization & Sentiment Analysis API is running!";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid company name provided.")]
    InvalidCompanyName,

    #[error("Internal server error: {0}")]
    PipelineFailed(String),

    #[error("Audio file not found.")]
    AudioNotFound,
}

impl ServiceError {
    /// Status code the HTTP layer answers with. Pipeline failures map to 404,
    /// not 500, to stay compatible with existing clients.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::InvalidCompanyName => 400,
            ServiceError::PipelineFailed(_) | ServiceError::AudioNotFound => 404,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub report: serde_json::Value,
    pub audio_file_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub message: String,
}

pub fn health() -> Health {
    Health { message: HEALTH_MESSAGE.to_string() }
}

/// Analyze `company` and return the report together with the audio URL.
pub async fn process_request(pipeline: &Pipeline, company: &str) -> Result<AnalyzeResponse, ServiceError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(ServiceError::InvalidCompanyName);
    }

    match analyze(pipeline, company).await {
        Ok(response) => {
            info!("Analysis completed successfully for {}", company);
            Ok(response)
        }
        Err(e) => {
            error!(company, "Exception occurred: {:#}", e);
            Err(ServiceError::PipelineFailed(format!("{:#}", e)))
        }
    }
}

async fn analyze(pipeline: &Pipeline, company: &str) -> anyhow::Result<AnalyzeResponse> {
    let (report_path, audio_path) = pipeline.run_pipeline(company).await?;

    let raw = tokio::fs::read_to_string(&report_path)
        .await
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    let report: serde_json::Value = serde_json::from_str(&sanitize_json(&raw))
        .with_context(|| format!("malformed report {}", report_path.display()))?;

    let filename = audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("audio path has no file name: {}", audio_path.display()))?;
    let audio_file_url = download_url(&pipeline.config().service.public_base_url, filename)?;

    Ok(AnalyzeResponse { report, audio_file_url })
}

/// `<base>/download/<filename>`, with the file name percent-encoded.
pub fn download_url(base: &str, filename: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("invalid public base URL {:?}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("public base URL cannot have a path: {}", base))?
        .pop_if_empty()
        .push("download")
        .push(filename);
    Ok(url.to_string())
}

/// Rewrite bare `NaN`, `Infinity` and `-Infinity` tokens (accepted by some
/// JSON producers, rejected by strict parsers) as the strings `"nan"`,
/// `"inf"` and `"-inf"`. String contents are left alone.
pub fn sanitize_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else {
            let replacement = [("-Infinity", "\"-inf\""), ("Infinity", "\"inf\""), ("NaN", "\"nan\"")]
                .into_iter()
                .find(|(token, _)| rest.starts_with(token));
            if let Some((token, quoted)) = replacement {
                out.push_str(quoted);
                rest = &rest[token.len()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Location of a downloadable file inside `output_dir`. Names that could
/// leave the directory (separators, `.`, `..`) are treated as missing.
pub async fn resolve_download(output_dir: &Path, filename: &str) -> Result<PathBuf, ServiceError> {
    if matches!(filename, "" | "." | "..") || filename.contains(['/', '\\']) {
        return Err(ServiceError::AudioNotFound);
    }

    let path = output_dir.join(filename);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        _ => Err(ServiceError::AudioNotFound),
    }
}
