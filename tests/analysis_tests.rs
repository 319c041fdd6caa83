// Integration tests for the analysis orchestrator
//
// These tests drive the scoring state machine through a scripted mock
// backend: retry/backoff behavior, terminal-error degradation, budget
// gating, fallback completeness, and session aggregation.

use async_trait::async_trait;
use prepdeck::analysis::{
    AnalysisBackend, AnalysisError, AnalysisOrchestrator, AnalysisRecord, FallbackScorer,
    InterviewCategory, ModelReply, ModelRequest, ReadinessLevel, RetryPolicy, Scores,
    FALLBACK_MODEL_ID,
};
use prepdeck::budget::{CostLedger, LimitStatus, Scope};
use prepdeck::config::{AnalysisConfig, BudgetConfig, RetryConfig};
use prepdeck::reconstruct::{QuestionResponse, SpeechMetrics, NO_TRANSCRIPTION_SENTINEL};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// What the mock backend should do for one call
enum Outcome {
    Reply(String),
    Status(u16),
}

/// Scripted backend: plays back outcomes in order, then repeats the last one
struct MockBackend {
    script: Mutex<VecDeque<Outcome>>,
    calls: AtomicUsize,
}

impl MockBackend {
    fn new(script: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn complete(&self, _request: &ModelRequest) -> Result<ModelReply, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().await;
        let outcome = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            match script.front().unwrap() {
                Outcome::Reply(s) => Outcome::Reply(s.clone()),
                Outcome::Status(s) => Outcome::Status(*s),
            }
        };

        match outcome {
            Outcome::Reply(content) => Ok(ModelReply {
                content,
                input_tokens: 500,
                output_tokens: 200,
            }),
            Outcome::Status(status) => Err(AnalysisError::Http {
                status,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

fn good_reply() -> Outcome {
    Outcome::Reply(
        r#"{"communication": 80, "content": 75, "domain": 70,
            "strengths": ["clear structure"], "improvements": ["more detail"]}"#
            .to_string(),
    )
}

fn response(id: &str, text: &str) -> QuestionResponse {
    QuestionResponse {
        question_id: id.to_string(),
        question_text: "Tell me about a challenge you faced".to_string(),
        answer_text: text.to_string(),
        duration_seconds: 45.0,
        excerpt: text.chars().take(60).collect(),
        metrics: SpeechMetrics::compute(text, 45.0, 0.9),
    }
}

fn long_answer() -> String {
    "In my previous role the situation was that our service kept timing out so my task \
     was to find the cause and my action was to profile the system and the result was a \
     large improvement in latency and reliability for the whole team"
        .to_string()
}

fn test_config() -> AnalysisConfig {
    AnalysisConfig {
        retry: RetryConfig {
            max_retries: 3,
            base_delay_ms: 100,
            multiplier: 2.0,
            max_delay_ms: 10_000,
        },
        ..AnalysisConfig::default()
    }
}

fn orchestrator(backend: Arc<MockBackend>, ledger: Arc<CostLedger>) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(backend, ledger, test_config())
}

fn scopes() -> (Scope, Scope) {
    (
        Scope::Session("s1".to_string()),
        Scope::User("u1".to_string()),
    )
}

// ============================================================================
// Retry behavior
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retried_then_succeed() {
    // 429 three times, then a good reply: three backoff delays, then a
    // real scored record
    let backend = MockBackend::new(vec![
        Outcome::Status(429),
        Outcome::Status(429),
        Outcome::Status(429),
        good_reply(),
    ]);
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let orch = orchestrator(Arc::clone(&backend), ledger);
    let (session, user) = scopes();

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Behavioral,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 4);
    assert_eq!(record.model_used, test_config().star_model);
    assert!((record.scores.communication - 80.0).abs() < 1e-9);
    assert_eq!(record.input_tokens, 500);
    assert!(record.cost_cents > 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_falls_back() {
    // Persistent 500: initial attempt + max_retries retries, then fallback
    let backend = MockBackend::new(vec![Outcome::Status(500)]);
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&ledger));
    let (session, user) = scopes();

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Behavioral,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 4, "1 initial + 3 retries");
    assert_eq!(record.model_used, FALLBACK_MODEL_ID);
    assert_eq!(record.cost_cents, 0.0);

    // Failed calls must not touch the ledger
    assert_eq!(ledger.check_limit(&session).await, LimitStatus::Ok);
    assert_eq!(ledger.daily_totals(&session).await.total_cost_cents, 0.0);
}

#[tokio::test]
async fn test_terminal_error_causes_zero_retries() {
    let backend = MockBackend::new(vec![Outcome::Status(401)]);
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let orch = orchestrator(Arc::clone(&backend), ledger);
    let (session, user) = scopes();

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Technical,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 1, "401 must not be retried");
    assert_eq!(record.model_used, FALLBACK_MODEL_ID);
}

#[test]
fn test_backoff_delay_formula() {
    let policy = RetryPolicy::new(RetryConfig {
        max_retries: 5,
        base_delay_ms: 1000,
        multiplier: 2.0,
        max_delay_ms: 5000,
    });

    assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    // Capped by max_delay
    assert_eq!(policy.delay_for(3), Duration::from_millis(5000));
    assert_eq!(policy.delay_for(10), Duration::from_millis(5000));
}

#[test]
fn test_retryable_classification() {
    for status in [429u16, 500, 502, 503, 504] {
        let e = AnalysisError::Http {
            status,
            message: String::new(),
        };
        assert!(e.is_retryable(), "{} should be retryable", status);
    }
    for status in [400u16, 401, 403, 404] {
        let e = AnalysisError::Http {
            status,
            message: String::new(),
        };
        assert!(!e.is_retryable(), "{} should be terminal", status);
    }
    assert!(AnalysisError::Timeout.is_retryable());
    assert!(!AnalysisError::InvalidReply("bad".to_string()).is_retryable());
}

// ============================================================================
// Budget gating
// ============================================================================

#[tokio::test]
async fn test_exceeded_budget_skips_paid_call() {
    let budget = BudgetConfig {
        session_daily_limit_cents: 100.0,
        ..BudgetConfig::default()
    };
    let ledger = Arc::new(CostLedger::new(budget));
    let (session, user) = scopes();

    // Spend the whole session budget up front
    ledger.record_usage(&session, 0, 0, 100.0).await;
    assert_eq!(ledger.check_limit(&session).await, LimitStatus::Exceeded);

    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&ledger));

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Behavioral,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 0, "no network call past the ceiling");
    assert_eq!(record.model_used, FALLBACK_MODEL_ID);
}

#[tokio::test]
async fn test_critical_budget_still_permits_call() {
    let budget = BudgetConfig {
        session_daily_limit_cents: 100.0,
        ..BudgetConfig::default()
    };
    let ledger = Arc::new(CostLedger::new(budget));
    let (session, user) = scopes();

    // 95% spent: critical, but not blocked
    ledger.record_usage(&session, 0, 0, 95.0).await;
    assert_eq!(ledger.check_limit(&session).await, LimitStatus::Critical);

    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&ledger));

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Behavioral,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 1);
    assert_ne!(record.model_used, FALLBACK_MODEL_ID);
}

#[tokio::test]
async fn test_successful_call_records_usage_to_both_scopes() {
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&ledger));
    let (session, user) = scopes();

    orch.score_response(
        &response("q1", &long_answer()),
        InterviewCategory::Behavioral,
        &session,
        &user,
    )
    .await;

    let session_totals = ledger.daily_totals(&session).await;
    let user_totals = ledger.daily_totals(&user).await;
    assert!(session_totals.total_cost_cents > 0.0);
    assert!(user_totals.total_cost_cents > 0.0);
    assert_eq!(session_totals.input_tokens, 500);
    assert_eq!(user_totals.output_tokens, 200);
}

// ============================================================================
// Model routing and fallback
// ============================================================================

#[tokio::test]
async fn test_model_selection_by_category() {
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(backend, ledger);
    let cfg = test_config();

    assert_eq!(orch.model_for(InterviewCategory::Behavioral), cfg.star_model);
    assert_eq!(orch.model_for(InterviewCategory::Leadership), cfg.star_model);
    assert_eq!(
        orch.model_for(InterviewCategory::Technical),
        cfg.technical_model
    );
    assert_eq!(orch.model_for(InterviewCategory::Custom), cfg.technical_model);
}

#[tokio::test]
async fn test_unparsable_reply_falls_back_without_retry() {
    let backend = MockBackend::new(vec![Outcome::Reply("not json at all".to_string())]);
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let orch = orchestrator(Arc::clone(&backend), ledger);
    let (session, user) = scopes();

    let record = orch
        .score_response(
            &response("q1", &long_answer()),
            InterviewCategory::Behavioral,
            &session,
            &user,
        )
        .await;

    assert_eq!(backend.call_count(), 1);
    assert_eq!(record.model_used, FALLBACK_MODEL_ID);
}

#[test]
fn test_fallback_record_is_always_complete() {
    let inputs = [
        long_answer(),
        "short".to_string(),
        String::new(),
        NO_TRANSCRIPTION_SENTINEL.to_string(),
    ];

    for text in &inputs {
        for category in [InterviewCategory::Behavioral, InterviewCategory::Technical] {
            let record = FallbackScorer::score(&response("q1", text), category);

            assert_eq!(record.question_id, "q1");
            assert_eq!(record.model_used, FALLBACK_MODEL_ID);
            assert!(record.scores.communication >= 0.0 && record.scores.communication <= 100.0);
            assert!(record.scores.content >= 0.0 && record.scores.content <= 100.0);
            assert!(record.scores.domain >= 0.0 && record.scores.domain <= 100.0);
            assert_eq!(record.cost_cents, 0.0);
            assert_eq!(record.input_tokens, 0);
            // Empty answers still get actionable improvements
            assert!(!record.strengths.is_empty() || !record.improvements.is_empty());
        }
    }
}

#[test]
fn test_fallback_is_deterministic() {
    let a = FallbackScorer::score(&response("q1", &long_answer()), InterviewCategory::Behavioral);
    let b = FallbackScorer::score(&response("q1", &long_answer()), InterviewCategory::Behavioral);
    assert!((a.scores.overall() - b.scores.overall()).abs() < 1e-12);
    assert_eq!(a.strengths, b.strengths);
}

// ============================================================================
// Batch scoring and aggregation
// ============================================================================

#[tokio::test]
async fn test_score_all_preserves_question_association() {
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(backend, ledger);
    let (session, user) = scopes();

    let responses: Vec<QuestionResponse> = (0..5)
        .map(|i| response(&format!("q{}", i), &long_answer()))
        .collect();

    let records = orch
        .score_all(&responses, InterviewCategory::Behavioral, &session, &user)
        .await;

    assert_eq!(records.len(), 5);
    for (response, record) in responses.iter().zip(&records) {
        assert_eq!(response.question_id, record.question_id);
    }
}

fn record_with_overall(id: &str, score: f64) -> AnalysisRecord {
    AnalysisRecord {
        question_id: id.to_string(),
        scores: Scores {
            communication: score,
            content: score,
            domain: score,
        },
        strengths: Vec::new(),
        improvements: Vec::new(),
        model_used: "gpt-4o-mini".to_string(),
        input_tokens: 100,
        output_tokens: 50,
        cost_cents: 0.5,
        processing_time_ms: 10,
    }
}

#[tokio::test]
async fn test_session_summary_aggregation() {
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(backend, ledger);

    let records = vec![
        record_with_overall("q1", 90.0),
        record_with_overall("q2", 75.0),
        record_with_overall("q3", 60.0),
        record_with_overall("q4", 40.0),
    ];

    let summary = orch.score_session(&records);

    assert_eq!(summary.question_count, 4);
    assert!((summary.average_score - 66.25).abs() < 1e-9);
    assert!((summary.median_score - 67.5).abs() < 1e-9);
    assert_eq!(summary.distribution.excellent, 1);
    assert_eq!(summary.distribution.good, 1);
    assert_eq!(summary.distribution.fair, 1);
    assert_eq!(summary.distribution.needs_improvement, 1);
    assert_eq!(summary.readiness, ReadinessLevel::NeedsPractice);
    assert!((summary.total_cost_cents - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_readiness_thresholds() {
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let backend = MockBackend::new(vec![good_reply()]);
    let orch = orchestrator(backend, ledger);

    let ready = orch.score_session(&[record_with_overall("q1", 85.0)]);
    assert_eq!(ready.readiness, ReadinessLevel::Ready);

    let practice = orch.score_session(&[record_with_overall("q1", 65.0)]);
    assert_eq!(practice.readiness, ReadinessLevel::NeedsPractice);

    let improve = orch.score_session(&[record_with_overall("q1", 30.0)]);
    assert_eq!(improve.readiness, ReadinessLevel::SignificantImprovement);

    let empty = orch.score_session(&[]);
    assert_eq!(empty.readiness, ReadinessLevel::SignificantImprovement);
    assert_eq!(empty.question_count, 0);
}
