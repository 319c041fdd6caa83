use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The time window during which one question was being answered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSegment {
    /// Question identifier from the question bank
    pub question_id: String,

    /// Question text as presented to the candidate
    pub question_text: String,

    /// When the question was presented (epoch milliseconds)
    pub start_ms: i64,

    /// When the next question began or the session ended (epoch milliseconds)
    pub end_ms: i64,

    /// Answer duration in seconds
    pub duration_seconds: f64,
}

/// An open segment that has not been closed yet
#[derive(Debug, Clone)]
struct OpenSegment {
    question_id: String,
    question_text: String,
    start_ms: i64,
}

/// Records start/end boundaries for each question during one recording.
///
/// Constructed per session and cleared at teardown; never shared across
/// sessions. Completed segments are append-only and ordered by presentation.
#[derive(Debug, Default)]
pub struct SegmentTracker {
    open: Option<OpenSegment>,
    completed: Vec<QuestionSegment>,
}

impl SegmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the current time as the start of a question's answer window.
    ///
    /// Tolerates misuse: if a segment is already open the call is a no-op,
    /// because a mistimed UI event must not corrupt an in-progress interview.
    pub fn start_segment(&mut self, question_id: &str, question_text: &str) {
        self.start_segment_at(question_id, question_text, Utc::now().timestamp_millis());
    }

    /// As [`start_segment`](Self::start_segment) at an explicit instant,
    /// for callers that already carry a timestamp
    pub fn start_segment_at(&mut self, question_id: &str, question_text: &str, now_ms: i64) {
        if let Some(open) = &self.open {
            warn!(
                "Segment already open for question {}; ignoring start for {}",
                open.question_id, question_id
            );
            return;
        }

        info!("Segment started: question {}", question_id);

        self.open = Some(OpenSegment {
            question_id: question_id.to_string(),
            question_text: question_text.to_string(),
            start_ms: now_ms,
        });
    }

    /// Close the open segment and append it to the completed list.
    ///
    /// A close with no open segment is tolerated with a warning.
    pub fn end_segment(&mut self) {
        self.end_segment_at(Utc::now().timestamp_millis());
    }

    /// As [`end_segment`](Self::end_segment) at an explicit instant
    pub fn end_segment_at(&mut self, now_ms: i64) {
        let Some(open) = self.open.take() else {
            warn!("No open segment to close; ignoring");
            return;
        };

        // Clock adjustments could make end precede start; clamp instead of
        // recording a negative duration.
        let end_ms = now_ms.max(open.start_ms);
        let duration_seconds = (end_ms - open.start_ms) as f64 / 1000.0;

        info!(
            "Segment closed: question {} ({:.1}s)",
            open.question_id, duration_seconds
        );

        self.completed.push(QuestionSegment {
            question_id: open.question_id,
            question_text: open.question_text,
            start_ms: open.start_ms,
            end_ms,
            duration_seconds,
        });
    }

    /// Ordered snapshot of completed segments
    pub fn segments(&self) -> Vec<QuestionSegment> {
        self.completed.clone()
    }

    /// Number of completed segments
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Whether a question is currently being answered
    pub fn has_open_segment(&self) -> bool {
        self.open.is_some()
    }

    /// Reset all state. Idempotent; called at session teardown.
    pub fn clear(&mut self) {
        self.open = None;
        self.completed.clear();
    }
}
