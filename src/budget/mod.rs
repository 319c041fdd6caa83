//! Cost budgeting
//!
//! Accumulates token usage and monetary cost per session and per user
//! against configurable daily and monthly ceilings. The ledger is advisory
//! budgeting, not billing-grade accounting: the pre-call limit check and the
//! post-call recording are individually atomic, and one in-flight call may
//! land just past a ceiling.

mod ledger;

pub use ledger::{CostLedger, LimitStatus, Scope, UsageTotals};
