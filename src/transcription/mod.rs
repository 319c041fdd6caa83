//! Transcript acquisition
//!
//! Obtains one full-session transcript per recording, through either of two
//! strategies that normalize to the same result shape:
//! - a streaming session that buffers audio chunks during the interview and
//!   performs exactly one transcription call at finalize time
//! - a batch upload of the complete recording after the fact
//!
//! This layer performs no retries; the caller decides whether a failure is
//! worth retrying or degrading around.

mod acquirer;
mod client;
mod stream;
mod types;

pub use acquirer::{TranscriptSource, TranscriptionAcquirer};
pub use client::HttpTranscriptionClient;
pub use stream::StreamingSession;
pub use types::{TranscriptSentence, TranscriptWord, TranscriptionResult};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures from the speech-to-text endpoint or its inputs
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("no audio data to transcribe")]
    EmptyAudio,

    #[error("transcription service rate limited the request")]
    RateLimited,

    #[error("transcription request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transcription request timed out")]
    Timeout,

    #[error("transcription request failed: {0}")]
    Network(String),

    #[error("transcription response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("streaming session was aborted")]
    Aborted,
}

/// A speech-to-text backend: one media blob in, one transcript out
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(&self, audio: Bytes) -> Result<TranscriptionResult, TranscriptionError>;
}
