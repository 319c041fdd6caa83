//! Transcript-to-segment reconstruction
//!
//! Partitions one full-session transcript into per-question answer texts
//! using the timing recorded by the segment tracker. Two modes:
//! - timing-proportional word windows with a small overlap buffer at interior
//!   boundaries (the normal path)
//! - an exact equal split when durations are too short for proportional
//!   timing to be trustworthy

mod metrics;
mod reconstructor;
mod response;

pub use metrics::{count_filler_words, filler_ratio, SpeechMetrics};
pub use reconstructor::{SegmentReconstructor, NO_TRANSCRIPTION_SENTINEL};
pub use response::QuestionResponse;
