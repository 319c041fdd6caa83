use super::config::SessionConfig;
use super::report::{SessionReport, SessionStatus};
use crate::analysis::AnalysisOrchestrator;
use crate::budget::Scope;
use crate::reconstruct::SegmentReconstructor;
use crate::segment::SegmentTracker;
use crate::transcription::{StreamingSession, TranscriptSource, TranscriptionAcquirer};
use anyhow::{bail, Result};
use bytes::Bytes;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// One interview practice run: question boundaries, live audio buffering,
/// and the finish-time pipeline that turns the recording into scored
/// feedback.
///
/// Constructed per session with injected collaborators; no global state.
/// Abort bumps an epoch counter so pipeline results that resolve after an
/// abort are discarded rather than applied.
pub struct PracticeSession {
    config: SessionConfig,
    acquirer: Arc<TranscriptionAcquirer>,
    reconstructor: Arc<SegmentReconstructor>,
    orchestrator: Arc<AnalysisOrchestrator>,

    started_at: chrono::DateTime<chrono::Utc>,
    tracker: Mutex<SegmentTracker>,
    streaming: Mutex<StreamingSession>,
    epoch: AtomicU64,
}

impl PracticeSession {
    pub fn new(
        config: SessionConfig,
        acquirer: Arc<TranscriptionAcquirer>,
        reconstructor: Arc<SegmentReconstructor>,
        orchestrator: Arc<AnalysisOrchestrator>,
    ) -> Self {
        info!("Creating practice session: {}", config.session_id);

        let streaming = acquirer.create_session();

        Self {
            config,
            acquirer,
            reconstructor,
            orchestrator,
            started_at: Utc::now(),
            tracker: Mutex::new(SegmentTracker::new()),
            streaming: Mutex::new(streaming),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// A question was presented; open its answer window
    pub async fn start_question(&self, question_id: &str, question_text: &str) {
        self.tracker.lock().await.start_segment(question_id, question_text);
    }

    /// The current question's answer finished; close its window
    pub async fn end_question(&self) {
        self.tracker.lock().await.end_segment();
    }

    /// Buffer one live audio chunk for streaming acquisition.
    /// Pure buffering; never blocks on the network.
    pub async fn push_audio_chunk(&self, chunk: Bytes) {
        self.streaming.lock().await.push_chunk(chunk);
    }

    pub async fn status(&self) -> SessionStatus {
        let tracker = self.tracker.lock().await;
        let streaming = self.streaming.lock().await;
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStatus {
            session_id: self.config.session_id.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            questions_completed: tracker.len(),
            question_open: tracker.has_open_segment(),
            buffered_audio_bytes: streaming.buffered_bytes(),
        }
    }

    /// Complete the session: resolve one transcript, slice it per question,
    /// score every answer, and aggregate.
    ///
    /// `recording` is the complete media blob, used as the batch fallback
    /// when streaming finalize fails (and as the only path when no chunks
    /// were streamed). Transient and budget failures degrade inside the
    /// scoring layer; only missing input or an abort fail this call.
    pub async fn finish(&self, recording: Option<Bytes>) -> Result<SessionReport> {
        let epoch = self.epoch.load(Ordering::SeqCst);

        info!("Finishing practice session: {}", self.config.session_id);

        let segments = {
            let mut tracker = self.tracker.lock().await;
            // A session ending mid-question closes the open segment
            if tracker.has_open_segment() {
                tracker.end_segment();
            }
            tracker.segments()
        };

        if segments.is_empty() {
            bail!("Session has no recorded question segments; nothing to process");
        }

        let transcript = self.resolve_transcript(recording).await?;
        self.ensure_not_aborted(epoch)?;

        let responses = self.reconstructor.reconstruct(&transcript, &segments);

        let session_scope = Scope::Session(self.config.session_id.clone());
        let user_scope = Scope::User(self.config.user_id.clone());

        let records = self
            .orchestrator
            .score_all(&responses, self.config.category, &session_scope, &user_scope)
            .await;
        self.ensure_not_aborted(epoch)?;

        let summary = self.orchestrator.score_session(&records);

        info!(
            "Session {} complete: {} questions, avg {:.1}, {:?}",
            self.config.session_id,
            summary.question_count,
            summary.average_score,
            summary.readiness
        );

        Ok(SessionReport {
            session_id: self.config.session_id.clone(),
            user_id: self.config.user_id.clone(),
            category: self.config.category,
            responses,
            records,
            summary,
            transcript_confidence: transcript.confidence,
            transcript_duration_seconds: transcript.duration_seconds,
        })
    }

    /// Abort the session. Safe at any point, including while a finish is in
    /// flight; that finish's results are discarded when it next checks the
    /// epoch. Idempotent.
    pub async fn abort(&self) {
        info!("Aborting practice session: {}", self.config.session_id);

        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.streaming.lock().await.abort();
        self.tracker.lock().await.clear();
    }

    /// Streamed result preferred (audio was already in flight during the
    /// interview); batch upload of the full recording is the degraded path.
    async fn resolve_transcript(
        &self,
        recording: Option<Bytes>,
    ) -> Result<crate::transcription::TranscriptionResult> {
        let streamed = {
            let mut streaming = self.streaming.lock().await;
            if streaming.chunk_count() > 0 {
                match streaming.finalize().await {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warn!(
                            "Streaming finalize failed ({}); falling back to batch upload",
                            e
                        );
                        None
                    }
                }
            } else {
                None
            }
        };

        let source = match (streamed, recording) {
            (Some(result), _) => TranscriptSource::Streamed(result),
            (None, Some(blob)) if !blob.is_empty() => TranscriptSource::Batch(blob),
            (None, _) => {
                bail!("No audio available: streaming failed and no recording blob was provided")
            }
        };

        Ok(self.acquirer.resolve(source).await?)
    }

    fn ensure_not_aborted(&self, epoch: u64) -> Result<()> {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            bail!("Session {} was aborted; discarding results", self.config.session_id);
        }
        Ok(())
    }
}
