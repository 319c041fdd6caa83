use super::record::{AnalysisRecord, Scores};
use super::InterviewCategory;
use crate::reconstruct::{filler_ratio, QuestionResponse, NO_TRANSCRIPTION_SENTINEL};

/// model_used value for heuristic records
pub const FALLBACK_MODEL_ID: &str = "heuristic-v1";

const STAR_KEYWORDS: &[&str] = &[
    "situation", "task", "action", "result", "challenge", "example", "team", "led", "learned",
];

const TECHNICAL_KEYWORDS: &[&str] = &[
    "design", "implement", "system", "data", "performance", "complexity", "test", "scale",
    "algorithm", "tradeoff",
];

/// Deterministic rule-based scorer.
///
/// Used whenever the AI path is unavailable (terminal errors, retry
/// exhaustion, budget ceilings). Always produces a complete record, for any
/// input including the empty-transcript sentinel, so a session can never end
/// without feedback.
pub struct FallbackScorer;

impl FallbackScorer {
    /// Score one response by length, pacing, fillers, and keyword coverage
    pub fn score(response: &QuestionResponse, category: InterviewCategory) -> AnalysisRecord {
        if response.answer_text.trim().is_empty()
            || response.answer_text == NO_TRANSCRIPTION_SENTINEL
        {
            return Self::empty_answer_record(response);
        }

        let words = response.metrics.word_count;
        let wpm = response.metrics.speaking_rate_wpm;
        let fillers = filler_ratio(&response.answer_text);

        // Length: very short answers lack substance, very long ones ramble
        let content = match words {
            0..=19 => 25.0,
            20..=59 => 50.0,
            60..=349 => 75.0,
            _ => 60.0,
        };

        // Pacing: conversational speech sits around 110-160 wpm
        let pacing = if (110.0..=160.0).contains(&wpm) {
            75.0
        } else if (80.0..110.0).contains(&wpm) || (160.0..200.0).contains(&wpm) {
            60.0
        } else {
            45.0
        };
        let communication = (pacing - fillers * 100.0).max(20.0);

        let keywords: &[&str] = if category.uses_technical_model() {
            TECHNICAL_KEYWORDS
        } else {
            STAR_KEYWORDS
        };
        let lowered = response.answer_text.to_lowercase();
        let hits = keywords.iter().filter(|k| lowered.contains(*k)).count();
        let domain = (35.0 + hits as f64 * 8.0).min(85.0);

        let mut strengths = Vec::new();
        let mut improvements = Vec::new();

        if (60..=349).contains(&words) {
            strengths.push("Answer has substantial length and detail".to_string());
        } else if words < 60 {
            improvements.push("Expand the answer with more specific detail".to_string());
        } else {
            improvements.push("Tighten the answer; it runs long".to_string());
        }

        if fillers < 0.03 {
            strengths.push("Few filler words".to_string());
        } else {
            improvements.push("Reduce filler words (um, uh, like)".to_string());
        }

        if hits >= 3 {
            strengths.push(if category.uses_technical_model() {
                "Covers concrete technical considerations".to_string()
            } else {
                "Answer follows a clear STAR-like structure".to_string()
            });
        } else {
            improvements.push(if category.uses_technical_model() {
                "Discuss design choices and trade-offs explicitly".to_string()
            } else {
                "Structure the answer around situation, task, action, result".to_string()
            });
        }

        AnalysisRecord {
            question_id: response.question_id.clone(),
            scores: Scores {
                communication,
                content,
                domain,
            }
            .clamped(),
            strengths,
            improvements,
            model_used: FALLBACK_MODEL_ID.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            cost_cents: 0.0,
            processing_time_ms: 0,
        }
    }

    fn empty_answer_record(response: &QuestionResponse) -> AnalysisRecord {
        AnalysisRecord {
            question_id: response.question_id.clone(),
            scores: Scores {
                communication: 10.0,
                content: 10.0,
                domain: 10.0,
            },
            strengths: Vec::new(),
            improvements: vec![
                "No spoken answer was captured for this question".to_string(),
                "Check the microphone and try answering again".to_string(),
            ],
            model_used: FALLBACK_MODEL_ID.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            cost_cents: 0.0,
            processing_time_ms: 0,
        }
    }
}
