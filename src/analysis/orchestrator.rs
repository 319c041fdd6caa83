use super::fallback::FallbackScorer;
use super::record::{AnalysisRecord, Scores};
use super::retry::RetryPolicy;
use super::summary::SessionSummary;
use super::{AnalysisBackend, AnalysisError, InterviewCategory, ModelReply, ModelRequest};
use crate::budget::{CostLedger, LimitStatus, Scope};
use crate::config::AnalysisConfig;
use crate::reconstruct::QuestionResponse;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// JSON shape the model is instructed to reply with
#[derive(Debug, Deserialize)]
struct ReplyScores {
    communication: f64,
    content: f64,
    domain: f64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
}

/// Drives per-response scoring: model routing, budget gating, retries, and
/// the heuristic fallback. Never fails a session; every response ends with a
/// complete record one way or the other.
pub struct AnalysisOrchestrator {
    backend: Arc<dyn AnalysisBackend>,
    ledger: Arc<CostLedger>,
    config: AnalysisConfig,
    retry: RetryPolicy,
}

impl AnalysisOrchestrator {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        ledger: Arc<CostLedger>,
        config: AnalysisConfig,
    ) -> Self {
        let retry = RetryPolicy::new(config.retry.clone());
        Self {
            backend,
            ledger,
            config,
            retry,
        }
    }

    /// Model identifier for a category
    pub fn model_for(&self, category: InterviewCategory) -> &str {
        if category.uses_technical_model() {
            &self.config.technical_model
        } else {
            &self.config.star_model
        }
    }

    fn cost_cents(&self, category: InterviewCategory, input_tokens: u64, output_tokens: u64) -> f64 {
        let (input_rate, output_rate) = if category.uses_technical_model() {
            (
                self.config.technical_input_cents_per_1k,
                self.config.technical_output_cents_per_1k,
            )
        } else {
            (
                self.config.star_input_cents_per_1k,
                self.config.star_output_cents_per_1k,
            )
        };
        input_tokens as f64 / 1000.0 * input_rate + output_tokens as f64 / 1000.0 * output_rate
    }

    /// Score one response.
    ///
    /// The ledger is consulted before any network call; an exceeded ceiling
    /// on either scope skips the paid path entirely. Transient failures are
    /// retried with bounded backoff; everything else degrades to the
    /// heuristic scorer.
    pub async fn score_response(
        &self,
        response: &QuestionResponse,
        category: InterviewCategory,
        session_scope: &Scope,
        user_scope: &Scope,
    ) -> AnalysisRecord {
        let started = Instant::now();

        // Pre-call gate: do not spend into an already-exceeded budget
        for scope in [session_scope, user_scope] {
            match self.ledger.check_limit(scope).await {
                LimitStatus::Exceeded => {
                    info!(
                        "Budget exceeded for question {}; using fallback scorer",
                        response.question_id
                    );
                    return finish(FallbackScorer::score(response, category), started);
                }
                LimitStatus::Critical | LimitStatus::Warning => {
                    // Approaching the ceiling is logged by the ledger but
                    // still permits the call
                }
                LimitStatus::Ok => {}
            }
        }

        let request = self.build_request(response, category);

        match self.call_with_retries(&request, &response.question_id).await {
            Ok(reply) => match self.record_from_reply(response, category, &reply) {
                Ok(record) => {
                    self.ledger
                        .record_usage(
                            session_scope,
                            record.input_tokens,
                            record.output_tokens,
                            record.cost_cents,
                        )
                        .await;
                    self.ledger
                        .record_usage(
                            user_scope,
                            record.input_tokens,
                            record.output_tokens,
                            record.cost_cents,
                        )
                        .await;
                    finish(record, started)
                }
                Err(e) => {
                    warn!(
                        "Unusable scoring reply for question {}: {}; using fallback",
                        response.question_id, e
                    );
                    finish(FallbackScorer::score(response, category), started)
                }
            },
            Err(e) => {
                warn!(
                    "Scoring failed for question {}: {}; using fallback",
                    response.question_id, e
                );
                finish(FallbackScorer::score(response, category), started)
            }
        }
    }

    /// Score a batch of responses with bounded concurrency.
    ///
    /// Completion order is arbitrary; records are re-associated with their
    /// questions and returned in input order.
    pub async fn score_all(
        &self,
        responses: &[QuestionResponse],
        category: InterviewCategory,
        session_scope: &Scope,
        user_scope: &Scope,
    ) -> Vec<AnalysisRecord> {
        let futures: Vec<_> = responses
            .iter()
            .enumerate()
            .map(|(idx, response)| async move {
                let record = self
                    .score_response(response, category, session_scope, user_scope)
                    .await;
                (idx, record)
            })
            .collect();
        let mut records: Vec<(usize, AnalysisRecord)> = stream::iter(futures)
            .buffer_unordered(self.config.max_concurrent_scoring.max(1))
            .collect()
            .await;

        records.sort_by_key(|(idx, _)| *idx);
        records.into_iter().map(|(_, record)| record).collect()
    }

    /// Aggregate per-question records into a session verdict
    pub fn score_session(&self, records: &[AnalysisRecord]) -> SessionSummary {
        SessionSummary::from_records(records)
    }

    async fn call_with_retries(
        &self,
        request: &ModelRequest,
        question_id: &str,
    ) -> Result<ModelReply, AnalysisError> {
        let mut retries = 0;

        loop {
            match self.backend.complete(request).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() && retries < self.retry.max_retries() => {
                    let delay = self.retry.delay_for(retries);
                    warn!(
                        "Retryable scoring failure for question {} (retry {} in {:?}): {}",
                        question_id,
                        retries + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn build_request(
        &self,
        response: &QuestionResponse,
        category: InterviewCategory,
    ) -> ModelRequest {
        let system_prompt = if category.uses_technical_model() {
            "You are an experienced technical interviewer. Assess the candidate's answer for \
             correctness, depth, and engineering judgment. Reply with a JSON object: \
             {\"communication\": 0-100, \"content\": 0-100, \"domain\": 0-100, \
             \"strengths\": [..], \"improvements\": [..]}. \
             The domain score measures technical depth and rigor."
        } else {
            "You are an experienced interview coach. Assess the candidate's answer using the \
             STAR method (situation, task, action, result). Reply with a JSON object: \
             {\"communication\": 0-100, \"content\": 0-100, \"domain\": 0-100, \
             \"strengths\": [..], \"improvements\": [..]}. \
             The domain score measures STAR completeness."
        };

        let user_prompt = format!(
            "Question: {}\n\nAnswer ({} words, {:.0} wpm, {} filler words, {:.0}s):\n{}",
            response.question_text,
            response.metrics.word_count,
            response.metrics.speaking_rate_wpm,
            response.metrics.filler_words,
            response.duration_seconds,
            response.answer_text,
        );

        ModelRequest {
            model: self.model_for(category).to_string(),
            system_prompt: system_prompt.to_string(),
            user_prompt,
        }
    }

    fn record_from_reply(
        &self,
        response: &QuestionResponse,
        category: InterviewCategory,
        reply: &ModelReply,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let scores: ReplyScores = serde_json::from_str(&reply.content)
            .map_err(|e| AnalysisError::InvalidReply(e.to_string()))?;

        Ok(AnalysisRecord {
            question_id: response.question_id.clone(),
            scores: Scores {
                communication: scores.communication,
                content: scores.content,
                domain: scores.domain,
            }
            .clamped(),
            strengths: scores.strengths,
            improvements: scores.improvements,
            model_used: self.model_for(category).to_string(),
            input_tokens: reply.input_tokens,
            output_tokens: reply.output_tokens,
            cost_cents: self.cost_cents(category, reply.input_tokens, reply.output_tokens),
            processing_time_ms: 0,
        })
    }
}

fn finish(mut record: AnalysisRecord, started: Instant) -> AnalysisRecord {
    record.processing_time_ms = started.elapsed().as_millis() as u64;
    record
}
