use serde::{Deserialize, Serialize};

/// Filler tokens matched against individual words
const FILLER_TOKENS: &[&str] = &[
    "um", "uh", "er", "ah", "like", "so", "actually", "basically", "literally", "right",
];

/// Filler phrases matched against the running text
const FILLER_PHRASES: &[&str] = &["you know", "i mean", "kind of", "sort of"];

/// Per-answer speech metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechMetrics {
    /// Words in this answer
    pub word_count: usize,

    /// Words per minute over the segment's duration
    pub speaking_rate_wpm: f64,

    /// Filler tokens and phrases detected in the answer
    pub filler_words: usize,

    /// Confidence for this slice (0.0 to 1.0)
    pub confidence: f32,
}

impl SpeechMetrics {
    /// Compute metrics for one answer slice
    pub fn compute(answer_text: &str, duration_seconds: f64, confidence: f32) -> Self {
        let word_count = answer_text.split_whitespace().count();

        let speaking_rate_wpm = if duration_seconds > 0.0 {
            word_count as f64 / duration_seconds * 60.0
        } else {
            0.0
        };

        Self {
            word_count,
            speaking_rate_wpm,
            filler_words: count_filler_words(answer_text),
            confidence,
        }
    }

    pub fn empty() -> Self {
        Self {
            word_count: 0,
            speaking_rate_wpm: 0.0,
            filler_words: 0,
            confidence: 0.0,
        }
    }
}

/// Count filler tokens and phrases in a lowercased view of the text
pub fn count_filler_words(text: &str) -> usize {
    let lowered = text.to_lowercase();

    let token_hits = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| FILLER_TOKENS.contains(w))
        .count();

    let phrase_hits: usize = FILLER_PHRASES
        .iter()
        .map(|p| lowered.matches(p).count())
        .sum();

    token_hits + phrase_hits
}

/// Ratio of filler words to total words, used by the heuristic scorer
pub fn filler_ratio(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    count_filler_words(text) as f64 / words as f64
}
