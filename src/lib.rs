pub mod analysis;
pub mod budget;
pub mod config;
pub mod http;
pub mod reconstruct;
pub mod segment;
pub mod session;
pub mod transcription;

pub use analysis::{
    AnalysisBackend, AnalysisError, AnalysisOrchestrator, AnalysisRecord, FallbackScorer,
    InterviewCategory, ModelReply, ModelRequest, ReadinessLevel, RetryPolicy, Scores,
    SessionSummary,
};
pub use budget::{CostLedger, LimitStatus, Scope, UsageTotals};
pub use config::Config;
pub use http::{create_router, AppState};
pub use reconstruct::{QuestionResponse, SegmentReconstructor, SpeechMetrics};
pub use segment::{QuestionSegment, SegmentTracker};
pub use session::{PracticeSession, SessionConfig, SessionReport, SessionStatus};
pub use transcription::{
    HttpTranscriptionClient, StreamingSession, TranscriptSource, TranscriptionAcquirer,
    TranscriptionBackend, TranscriptionError, TranscriptionResult,
};
