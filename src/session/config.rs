use crate::analysis::InterviewCategory;
use serde::{Deserialize, Serialize};

/// Configuration for one practice session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "practice-2026-08-27-a1b2")
    pub session_id: String,

    /// The account running the session, for user-scope budgeting
    pub user_id: String,

    /// Interview category; routes scoring to a model tier
    pub category: InterviewCategory,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("practice-{}", uuid::Uuid::new_v4()),
            user_id: "anonymous".to_string(),
            category: InterviewCategory::Behavioral,
        }
    }
}
