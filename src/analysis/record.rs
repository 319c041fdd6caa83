use serde::{Deserialize, Serialize};

/// Score triple on a 0-100 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scores {
    /// Clarity, structure, pacing
    pub communication: f64,

    /// Substance and relevance of the answer
    pub content: f64,

    /// Category-specific dimension (STAR completeness, technical depth, ...)
    pub domain: f64,
}

impl Scores {
    pub fn overall(&self) -> f64 {
        (self.communication + self.content + self.domain) / 3.0
    }

    pub fn clamped(self) -> Self {
        Self {
            communication: self.communication.clamp(0.0, 100.0),
            content: self.content.clamp(0.0, 100.0),
            domain: self.domain.clamp(0.0, 100.0),
        }
    }
}

/// The scored feedback for one question. Immutable once produced; the
/// persistence layer owns it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub question_id: String,

    pub scores: Scores,

    /// What the answer did well
    pub strengths: Vec<String>,

    /// Concrete things to work on
    pub improvements: Vec<String>,

    /// Model that produced the scores, or the heuristic scorer's id
    pub model_used: String,

    pub input_tokens: u64,
    pub output_tokens: u64,

    /// What this record cost, in cents (zero for heuristic records)
    pub cost_cents: f64,

    pub processing_time_ms: u64,
}
