use crate::analysis::{AnalysisRecord, InterviewCategory, SessionSummary};
use crate::reconstruct::QuestionResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a finished session hands to the persistence/reporting layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub user_id: String,
    pub category: InterviewCategory,

    /// Per-question reconstructed answers
    pub responses: Vec<QuestionResponse>,

    /// Per-question scored feedback, same order as `responses`
    pub records: Vec<AnalysisRecord>,

    /// Session-level aggregation
    pub summary: SessionSummary,

    /// Overall transcript confidence (0.0 to 1.0)
    pub transcript_confidence: f32,

    /// Recording duration as reported by the transcription service
    pub transcript_duration_seconds: f64,
}

/// Point-in-time view of a running session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,

    /// Completed question segments so far
    pub questions_completed: usize,

    /// Whether a question is currently being answered
    pub question_open: bool,

    /// Audio buffered for streaming acquisition
    pub buffered_audio_bytes: usize,
}
