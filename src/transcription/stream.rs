use super::{TranscriptionBackend, TranscriptionError, TranscriptionResult};
use bytes::{Bytes, BytesMut};
use std::sync::Arc;
use tracing::{info, warn};

/// Streaming acquisition session.
///
/// Audio chunks are buffered append-only while the interview is in progress;
/// `finalize` concatenates them into one media blob and performs exactly one
/// transcription call. Buffering never suspends, so pushing a chunk can never
/// stall live recording.
pub struct StreamingSession {
    backend: Arc<dyn TranscriptionBackend>,
    chunks: Vec<Bytes>,
    aborted: bool,
}

impl StreamingSession {
    pub fn new(backend: Arc<dyn TranscriptionBackend>) -> Self {
        Self {
            backend,
            chunks: Vec::new(),
            aborted: false,
        }
    }

    /// Buffer one audio chunk. Fire-and-forget; chunks pushed after abort
    /// are dropped.
    pub fn push_chunk(&mut self, chunk: Bytes) {
        if self.aborted {
            warn!("Chunk pushed after abort; dropping {} bytes", chunk.len());
            return;
        }
        self.chunks.push(chunk);
    }

    /// Number of bytes buffered so far
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    /// Number of chunks buffered so far
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Discard all buffered audio. Any later finalize must fail.
    pub fn abort(&mut self) {
        info!("Streaming session aborted; discarding {} chunks", self.chunks.len());
        self.chunks.clear();
        self.aborted = true;
    }

    /// Concatenate everything buffered and make the single transcription
    /// call. Consumes the buffer; a session is finalized at most once.
    pub async fn finalize(&mut self) -> Result<TranscriptionResult, TranscriptionError> {
        if self.aborted {
            return Err(TranscriptionError::Aborted);
        }
        if self.chunks.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let total: usize = self.buffered_bytes();
        let mut blob = BytesMut::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            blob.extend_from_slice(&chunk);
        }

        info!("Finalizing streaming session: {} bytes buffered", total);

        self.backend.transcribe(blob.freeze()).await
    }
}
