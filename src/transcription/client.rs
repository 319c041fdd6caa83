use super::types::{TranscriptSentence, TranscriptWord, TranscriptionResult};
use super::{TranscriptionBackend, TranscriptionError};
use crate::config::TranscriptionConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Word/sentence-level transcript JSON returned by the STT endpoint
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    audio_duration: f64,
    #[serde(default)]
    words: Vec<WireWord>,
    #[serde(default)]
    sentences: Vec<WireSentence>,
}

#[derive(Debug, Deserialize)]
struct WireWord {
    text: String,
    start: f64,
    end: f64,
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct WireSentence {
    text: String,
    start: f64,
    end: f64,
}

/// HTTP speech-to-text client.
///
/// Performs exactly one POST per call and never retries; transient-failure
/// handling belongs to the invoking pipeline, not this primitive.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTranscriptionClient {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .with_context(|| format!("Missing API key in env var {}", config.api_key_env))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    fn normalize(response: TranscriptResponse) -> TranscriptionResult {
        TranscriptionResult {
            text: response.text,
            words: response
                .words
                .into_iter()
                .map(|w| TranscriptWord {
                    word: w.text,
                    start_s: w.start,
                    end_s: w.end,
                    confidence: w.confidence,
                })
                .collect(),
            sentences: response
                .sentences
                .into_iter()
                .map(|s| TranscriptSentence {
                    text: s.text,
                    start_s: s.start,
                    end_s: s.end,
                })
                .collect(),
            confidence: response.confidence,
            duration_seconds: response.audio_duration,
        }
    }
}

#[async_trait]
impl TranscriptionBackend for HttpTranscriptionClient {
    async fn transcribe(&self, audio: Bytes) -> Result<TranscriptionResult, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        info!("Uploading {} bytes for transcription", audio.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(audio)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else {
                    TranscriptionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TranscriptionError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        info!(
            "Transcription complete: {:.1}s of audio, {} words",
            parsed.audio_duration,
            parsed.words.len()
        );

        Ok(Self::normalize(parsed))
    }
}
