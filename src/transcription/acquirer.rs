use super::{StreamingSession, TranscriptionBackend, TranscriptionError, TranscriptionResult};
use bytes::Bytes;
use std::sync::Arc;

/// Where the session transcript comes from.
///
/// The streamed variant carries an already-resolved result so the "we
/// finalized during the session" path is a first-class branch rather than a
/// runtime patch of the batch path.
pub enum TranscriptSource {
    /// A result already produced by a finalized streaming session
    Streamed(TranscriptionResult),

    /// A complete recording blob still to be uploaded
    Batch(Bytes),
}

/// Front door for both acquisition strategies.
///
/// Holds the shared backend; hands out streaming sessions and performs
/// one-shot batch transcriptions. Both paths end in the same normalized
/// [`TranscriptionResult`].
pub struct TranscriptionAcquirer {
    backend: Arc<dyn TranscriptionBackend>,
}

impl TranscriptionAcquirer {
    pub fn new(backend: Arc<dyn TranscriptionBackend>) -> Self {
        Self { backend }
    }

    /// Start a streaming acquisition session
    pub fn create_session(&self) -> StreamingSession {
        StreamingSession::new(Arc::clone(&self.backend))
    }

    /// Batch path: one transcription call for a complete recording
    pub async fn transcribe_recording(
        &self,
        blob: Bytes,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.backend.transcribe(blob).await
    }

    /// Resolve either source to a transcript
    pub async fn resolve(
        &self,
        source: TranscriptSource,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        match source {
            TranscriptSource::Streamed(result) => Ok(result),
            TranscriptSource::Batch(blob) => self.transcribe_recording(blob).await,
        }
    }
}
