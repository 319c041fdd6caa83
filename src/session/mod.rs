//! Practice session management
//!
//! This module provides the `PracticeSession` abstraction that manages one
//! interview practice run end to end:
//! - question lifecycle via the segment tracker
//! - live audio chunk buffering for streaming acquisition
//! - session completion: transcript resolution (streamed preferred, batch
//!   fallback), per-question reconstruction, AI scoring, aggregation
//! - abort handling that discards in-flight results

mod config;
mod report;
mod session;

pub use config::SessionConfig;
pub use report::{SessionReport, SessionStatus};
pub use session::PracticeSession;
