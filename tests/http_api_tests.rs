// HTTP-level tests for the session control API: in-process requests against
// the full router, with both network backends replaced by fakes.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine;
use bytes::Bytes;
use prepdeck::analysis::{
    AnalysisBackend, AnalysisError, AnalysisOrchestrator, ModelReply, ModelRequest,
};
use prepdeck::budget::CostLedger;
use prepdeck::config::{AnalysisConfig, BudgetConfig, ReconstructionConfig};
use prepdeck::http::{create_router, AppState};
use prepdeck::reconstruct::SegmentReconstructor;
use prepdeck::transcription::{
    TranscriptionAcquirer, TranscriptionBackend, TranscriptionError, TranscriptionResult,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Fake STT backend: fails the first N calls, then returns a canned transcript
struct FakeTranscriber {
    text: String,
    fail_first: usize,
    calls: AtomicUsize,
}

impl FakeTranscriber {
    fn failing_first(text: &str, fail_first: usize) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            fail_first,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TranscriptionBackend for FakeTranscriber {
    async fn transcribe(&self, _audio: Bytes) -> Result<TranscriptionResult, TranscriptionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(TranscriptionError::Http {
                status: 503,
                message: "scripted outage".to_string(),
            });
        }
        Ok(TranscriptionResult {
            text: self.text.clone(),
            words: Vec::new(),
            sentences: Vec::new(),
            confidence: 0.9,
            duration_seconds: 30.0,
        })
    }
}

/// Fake scoring backend that always returns a well-formed reply
struct FakeScorer;

#[async_trait]
impl AnalysisBackend for FakeScorer {
    async fn complete(&self, _request: &ModelRequest) -> Result<ModelReply, AnalysisError> {
        Ok(ModelReply {
            content: r#"{"communication": 80, "content": 75, "domain": 70,
                         "strengths": [], "improvements": []}"#
                .to_string(),
            input_tokens: 300,
            output_tokens: 100,
        })
    }
}

fn make_app(transcriber: Arc<dyn TranscriptionBackend>) -> Router {
    let acquirer = Arc::new(TranscriptionAcquirer::new(transcriber));
    let reconstructor = Arc::new(SegmentReconstructor::new(ReconstructionConfig::default()));
    let ledger = Arc::new(CostLedger::new(BudgetConfig::default()));
    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        Arc::new(FakeScorer),
        ledger,
        AnalysisConfig::default(),
    ));
    create_router(AppState::new(acquirer, reconstructor, orchestrator))
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

async fn get(app: &Router, uri: &str) -> StatusCode {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test]
async fn test_failed_finish_leaves_session_retryable() {
    // Streaming finalize fails once; the batch upload then succeeds
    let transcriber = FakeTranscriber::failing_first("some transcript words here", 1);
    let app = make_app(transcriber);

    let status = post_json(&app, "/sessions/start", json!({"session_id": "s1"})).await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(
        &app,
        "/sessions/s1/questions/start",
        json!({"question_id": "q1", "question_text": "Tell me about yourself"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(&app, "/sessions/s1/audio", json!({"chunk": b64(b"chunk")})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let status = post_json(&app, "/sessions/s1/questions/end", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // No recording blob and a failed finalize: processing fails
    let status = post_json(&app, "/sessions/s1/finish", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The session must survive the failure so the client can retry
    let status = get(&app, "/sessions/s1/status").await;
    assert_eq!(status, StatusCode::OK, "failed finish must not discard the session");

    // Retrying with the full recording succeeds
    let status = post_json(
        &app,
        "/sessions/s1/finish",
        json!({"recording": b64(b"full-recording-blob")}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_successful_finish_retires_session() {
    let transcriber = FakeTranscriber::failing_first("some transcript words here", 0);
    let app = make_app(transcriber);

    let status = post_json(&app, "/sessions/start", json!({"session_id": "s1"})).await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(
        &app,
        "/sessions/s1/questions/start",
        json!({"question_id": "q1", "question_text": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(&app, "/sessions/s1/audio", json!({"chunk": b64(b"audio")})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let status = post_json(&app, "/sessions/s1/questions/end", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(&app, "/sessions/s1/finish", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // Only a successful finish removes the session
    assert_eq!(get(&app, "/sessions/s1/status").await, StatusCode::NOT_FOUND);
    assert_eq!(
        post_json(&app, "/sessions/s1/finish", json!({})).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_abort_reachable_after_failed_finish() {
    let transcriber = FakeTranscriber::failing_first("words", 1);
    let app = make_app(transcriber);

    let status = post_json(&app, "/sessions/start", json!({"session_id": "s1"})).await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(
        &app,
        "/sessions/s1/questions/start",
        json!({"question_id": "q1", "question_text": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let status = post_json(&app, "/sessions/s1/audio", json!({"chunk": b64(b"audio")})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let status = post_json(&app, "/sessions/s1/finish", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The client gives up instead of retrying; abort must still resolve
    let status = post_json(&app, "/sessions/s1/abort", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(get(&app, "/sessions/s1/status").await, StatusCode::NOT_FOUND);
}
