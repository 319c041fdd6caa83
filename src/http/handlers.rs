use super::state::AppState;
use crate::analysis::InterviewCategory;
use crate::session::{PracticeSession, SessionConfig, SessionReport};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Account running the session
    pub user_id: Option<String>,

    /// Interview category (default: behavioral)
    pub category: Option<InterviewCategory>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionStartRequest {
    pub question_id: String,
    pub question_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioChunkRequest {
    /// Base64-encoded audio bytes
    pub chunk: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct FinishSessionRequest {
    /// Base64-encoded complete recording, used as the batch fallback
    pub recording: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FinishSessionResponse {
    pub session_id: String,
    pub status: String,
    pub report: SessionReport,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(session_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Create a new practice session
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("practice-{}", uuid::Uuid::new_v4()));

    info!("Starting practice session: {}", session_id);

    // Check for an existing session with this id
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&session_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Session {} already exists", session_id),
                }),
            )
                .into_response();
        }
    }

    let config = SessionConfig {
        session_id: session_id.clone(),
        user_id: req.user_id.unwrap_or_else(|| "anonymous".to_string()),
        category: req.category.unwrap_or(InterviewCategory::Behavioral),
    };

    let session = Arc::new(PracticeSession::new(
        config,
        Arc::clone(&state.acquirer),
        Arc::clone(&state.reconstructor),
        Arc::clone(&state.orchestrator),
    ));

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), session);
    }

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id,
            status: "recording".to_string(),
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/questions/start
/// Open the answer window for a question
pub async fn start_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<QuestionStartRequest>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => {
            session
                .start_question(&req.question_id, &req.question_text)
                .await;
            (
                StatusCode::OK,
                Json(AckResponse {
                    session_id,
                    status: "question-open".to_string(),
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// POST /sessions/:session_id/questions/end
/// Close the open answer window
pub async fn end_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => {
            session.end_question().await;
            (
                StatusCode::OK,
                Json(AckResponse {
                    session_id,
                    status: "question-closed".to_string(),
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// POST /sessions/:session_id/audio
/// Buffer one live audio chunk for streaming acquisition
pub async fn push_audio(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<AudioChunkRequest>,
) -> impl IntoResponse {
    let chunk = match base64::engine::general_purpose::STANDARD.decode(&req.chunk) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid base64 audio chunk: {}", e),
                }),
            )
                .into_response();
        }
    };

    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => {
            session.push_audio_chunk(chunk).await;
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&session_id),
    }
}

/// POST /sessions/:session_id/finish
/// Run the recording-to-feedback pipeline and return the report
pub async fn finish_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<FinishSessionRequest>,
) -> impl IntoResponse {
    // The session stays registered until a finish succeeds: a failed
    // finish must be retryable (e.g. with the full recording attached),
    // and abort must stay reachable while a finish is in flight
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    let Some(session) = session else {
        return not_found(&session_id);
    };

    let recording = match req.recording {
        Some(encoded) => match base64::engine::general_purpose::STANDARD.decode(&encoded) {
            Ok(bytes) => Some(Bytes::from(bytes)),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid base64 recording: {}", e),
                    }),
                )
                    .into_response();
            }
        },
        None => None,
    };

    match session.finish(recording).await {
        Ok(report) => {
            {
                let mut sessions = state.sessions.write().await;
                sessions.remove(&session_id);
            }
            info!("Session {} finished successfully", session_id);
            (
                StatusCode::OK,
                Json(FinishSessionResponse {
                    session_id,
                    status: "complete".to_string(),
                    report,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to finish session {}: {}", session_id, e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: format!("Processing failed, try again: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /sessions/:session_id/abort
/// Abort a session and discard its state
pub async fn abort_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match session {
        Some(session) => {
            session.abort().await;
            info!("Session {} aborted", session_id);
            (
                StatusCode::OK,
                Json(AckResponse {
                    session_id,
                    status: "aborted".to_string(),
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /sessions/:session_id/status
/// Get status of a running session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => (StatusCode::OK, Json(session.status().await)).into_response(),
        None => not_found(&session_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
