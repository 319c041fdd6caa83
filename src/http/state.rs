use crate::analysis::AnalysisOrchestrator;
use crate::reconstruct::SegmentReconstructor;
use crate::session::PracticeSession;
use crate::transcription::TranscriptionAcquirer;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active practice sessions (session_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<PracticeSession>>>>,

    /// Pipeline collaborators injected into every new session
    pub acquirer: Arc<TranscriptionAcquirer>,
    pub reconstructor: Arc<SegmentReconstructor>,
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    pub fn new(
        acquirer: Arc<TranscriptionAcquirer>,
        reconstructor: Arc<SegmentReconstructor>,
        orchestrator: Arc<AnalysisOrchestrator>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            acquirer,
            reconstructor,
            orchestrator,
        }
    }
}
