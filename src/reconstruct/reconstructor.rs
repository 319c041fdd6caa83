use super::metrics::SpeechMetrics;
use super::response::QuestionResponse;
use crate::config::ReconstructionConfig;
use crate::segment::QuestionSegment;
use crate::transcription::TranscriptionResult;
use tracing::{info, warn};

/// Placed in answer_text when the transcript came back empty, so downstream
/// scoring can tell "candidate said nothing" apart from a pipeline bug.
pub const NO_TRANSCRIPTION_SENTINEL: &str = "No transcription available";

/// Splits one session transcript into per-question answers
pub struct SegmentReconstructor {
    config: ReconstructionConfig,
}

impl SegmentReconstructor {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    /// One QuestionResponse per segment, in segment order.
    ///
    /// Zero segments yields an empty list. An empty transcript yields one
    /// sentinel response per segment.
    pub fn reconstruct(
        &self,
        transcript: &TranscriptionResult,
        segments: &[QuestionSegment],
    ) -> Vec<QuestionResponse> {
        if segments.is_empty() {
            return Vec::new();
        }

        if transcript.text.trim().is_empty() {
            warn!(
                "Empty transcript for {} segments; emitting sentinel responses",
                segments.len()
            );
            return segments
                .iter()
                .map(|seg| QuestionResponse {
                    question_id: seg.question_id.clone(),
                    question_text: seg.question_text.clone(),
                    answer_text: NO_TRANSCRIPTION_SENTINEL.to_string(),
                    duration_seconds: seg.duration_seconds,
                    excerpt: NO_TRANSCRIPTION_SENTINEL.to_string(),
                    metrics: SpeechMetrics::empty(),
                })
                .collect();
        }

        let words: Vec<&str> = transcript.text.split_whitespace().collect();
        let durations: Vec<f64> = segments.iter().map(|s| s.duration_seconds).collect();
        let total_duration: f64 = durations.iter().sum();

        let windows = if self.is_degenerate(&durations, total_duration) {
            info!(
                "Degenerate durations (total {:.1}s); splitting {} words into {} equal chunks",
                total_duration,
                words.len(),
                segments.len()
            );
            equal_windows(segments.len(), words.len())
        } else {
            proportional_windows(
                &durations,
                words.len(),
                self.config.boundary_buffer_words,
            )
        };

        segments
            .iter()
            .zip(windows)
            .map(|(seg, (start, end))| {
                let answer_text = words[start..end].join(" ");
                let confidence = slice_confidence(transcript, start, end);
                let metrics =
                    SpeechMetrics::compute(&answer_text, seg.duration_seconds, confidence);

                QuestionResponse {
                    question_id: seg.question_id.clone(),
                    question_text: seg.question_text.clone(),
                    excerpt: make_excerpt(&answer_text),
                    answer_text,
                    duration_seconds: seg.duration_seconds,
                    metrics,
                }
            })
            .collect()
    }

    /// Timing too noisy for proportional splitting?
    fn is_degenerate(&self, durations: &[f64], total: f64) -> bool {
        total < self.config.min_total_seconds
            || durations.iter().any(|d| *d < self.config.min_segment_seconds)
    }
}

/// Map segment durations onto word-index windows proportionally.
///
/// Interior boundaries are widened by `buffer` words on each side, so
/// adjacent windows overlap by up to 2×buffer words. Losing a sentence
/// fragment at a boundary is worse than duplicating a few words, so the
/// overlap is intentional. The first window always starts at word 0 and the
/// last always ends at the final word.
fn proportional_windows(
    durations: &[f64],
    word_count: usize,
    buffer: usize,
) -> Vec<(usize, usize)> {
    let total: f64 = durations.iter().sum();
    let n = durations.len();
    let mut windows = Vec::with_capacity(n);
    let mut elapsed = 0.0;

    for (i, duration) in durations.iter().enumerate() {
        let start_ratio = elapsed / total;
        elapsed += duration;
        let end_ratio = elapsed / total;

        let start = if i == 0 {
            0
        } else {
            ((start_ratio * word_count as f64).floor() as usize).saturating_sub(buffer)
        };

        let end = if i == n - 1 {
            word_count
        } else {
            (((end_ratio * word_count as f64).floor() as usize) + buffer).min(word_count)
        };

        windows.push((start.min(end), end));
    }

    windows
}

/// Split `word_count` words into `n` equal contiguous chunks.
///
/// Exact partition: chunk lengths sum to word_count with no gaps and no
/// duplication, unlike the proportional mode's deliberate overlap.
fn equal_windows(n: usize, word_count: usize) -> Vec<(usize, usize)> {
    (0..n)
        .map(|i| (i * word_count / n, (i + 1) * word_count / n))
        .collect()
}

/// Average word confidence over a word-index window, falling back to the
/// transcript-level confidence when per-word values are unavailable
fn slice_confidence(transcript: &TranscriptionResult, start: usize, end: usize) -> f32 {
    let end = end.min(transcript.words.len());
    if start >= end {
        return transcript.confidence;
    }

    let confidences: Vec<f32> = transcript.words[start..end]
        .iter()
        .filter_map(|w| w.confidence)
        .collect();

    if confidences.is_empty() {
        transcript.confidence
    } else {
        confidences.iter().sum::<f32>() / confidences.len() as f32
    }
}

/// Short prefix of the answer for listings
fn make_excerpt(answer_text: &str) -> String {
    const EXCERPT_CHARS: usize = 160;
    if answer_text.chars().count() <= EXCERPT_CHARS {
        answer_text.to_string()
    } else {
        let cut: String = answer_text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}
