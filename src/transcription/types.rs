use serde::{Deserialize, Serialize};

/// One recognized word with its position in the recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,

    /// Seconds from the start of the recording
    pub start_s: f64,
    pub end_s: f64,

    /// Per-word confidence (0.0 to 1.0), if the service provides one
    pub confidence: Option<f32>,
}

/// One recognized sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSentence {
    pub text: String,
    pub start_s: f64,
    pub end_s: f64,
}

/// The normalized transcript of one full session.
///
/// Produced exactly once per recording, by either acquisition strategy, and
/// never shared across sessions. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcript text
    pub text: String,

    /// Word-level timings, ordered by start time
    pub words: Vec<TranscriptWord>,

    /// Sentence-level timings, ordered by start time
    pub sentences: Vec<TranscriptSentence>,

    /// Overall confidence (0.0 to 1.0)
    pub confidence: f32,

    /// Recording duration in seconds as reported by the service
    pub duration_seconds: f64,
}

impl TranscriptionResult {
    /// An empty transcript for recordings where nothing was recognized
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            words: Vec::new(),
            sentences: Vec::new(),
            confidence: 0.0,
            duration_seconds: 0.0,
        }
    }
}
