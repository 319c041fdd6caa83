//! AI response scoring
//!
//! Sends each reconstructed answer to an AI scoring backend, selecting a
//! model per interview category, retrying transient failures with bounded
//! exponential backoff, enforcing cost ceilings before every paid call, and
//! degrading to a deterministic heuristic scorer whenever the AI path is
//! unavailable. A session always ends with complete feedback; only its
//! fidelity varies.

mod client;
mod fallback;
mod orchestrator;
mod record;
mod retry;
mod summary;

pub use client::HttpAnalysisClient;
pub use fallback::{FallbackScorer, FALLBACK_MODEL_ID};
pub use orchestrator::AnalysisOrchestrator;
pub use record::{AnalysisRecord, Scores};
pub use retry::RetryPolicy;
pub use summary::{ReadinessLevel, ScoreDistribution, SessionSummary};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interview category, used to route to an appropriate model tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewCategory {
    Behavioral,
    Leadership,
    Technical,
    Custom,
}

impl InterviewCategory {
    /// Technical/custom answers need structured technical assessment;
    /// behavioral/leadership get by with a cheaper STAR-capable model.
    /// This is a cost/capability trade-off, not an accuracy requirement.
    pub fn uses_technical_model(&self) -> bool {
        matches!(self, InterviewCategory::Technical | InterviewCategory::Custom)
    }
}

/// One chat-completion request to the scoring backend
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// The backend's reply: JSON-shaped scores plus token usage
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Failures from the AI scoring backend
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("scoring request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("scoring request timed out")]
    Timeout,

    #[error("scoring request failed: {0}")]
    Network(String),

    #[error("scoring reply could not be parsed: {0}")]
    InvalidReply(String),
}

impl AnalysisError {
    /// Transient failures worth retrying: rate limiting, server errors,
    /// timeouts, transport failures. 4xx request errors are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Http { status, .. } => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            AnalysisError::Timeout | AnalysisError::Network(_) => true,
            AnalysisError::InvalidReply(_) => false,
        }
    }
}

/// An AI chat-completion backend
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, AnalysisError>;
}
