//! HTTP API server for the recording controller (browser front end)
//!
//! This module provides a REST API for driving practice sessions:
//! - POST /sessions/start - Create a session
//! - POST /sessions/:id/questions/start - Open a question's answer window
//! - POST /sessions/:id/questions/end - Close the open window
//! - POST /sessions/:id/audio - Buffer a live audio chunk
//! - POST /sessions/:id/finish - Run the pipeline, return the report
//! - POST /sessions/:id/abort - Abort and discard
//! - GET  /sessions/:id/status - Query session status
//! - GET  /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
