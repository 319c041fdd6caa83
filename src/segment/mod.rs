//! Question segment tracking
//!
//! Records which time window of one continuous recording belongs to which
//! interview question. The interview UI is strictly sequential, so a single
//! open-segment marker (rather than a stack) is enough: at most one question
//! is being answered at any moment.

mod tracker;

pub use tracker::{QuestionSegment, SegmentTracker};
