use super::metrics::SpeechMetrics;
use serde::{Deserialize, Serialize};

/// One question's reconstructed answer, ready for scoring.
///
/// Derived deterministically from a (transcript, segment list) pair; handed
/// to the analysis orchestrator and not kept afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question_id: String,
    pub question_text: String,

    /// The words attributed to this question's time window
    pub answer_text: String,

    /// Answer duration in seconds, from the segment timing
    pub duration_seconds: f64,

    /// Short excerpt of the answer for listings and logs
    pub excerpt: String,

    /// Speech metrics computed from this answer's own slice
    pub metrics: SpeechMetrics,
}
