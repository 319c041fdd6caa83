use crate::config::BudgetConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Whose spending a ledger entry belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Session(String),
    User(String),
}

impl Scope {
    fn key(&self) -> String {
        match self {
            Scope::Session(id) => format!("session:{}", id),
            Scope::User(id) => format!("user:{}", id),
        }
    }
}

/// Result of a pre-call limit check, worst period wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    Ok,
    Warning,
    Critical,
    Exceeded,
}

/// Accumulated usage within one (scope, period) bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,

    /// Monotonically non-decreasing within a period; a fresh period starts
    /// a fresh bucket rather than resetting this one
    pub total_cost_cents: f64,
}

/// Per-scope daily/monthly cost ledger.
///
/// Periods are keyed by UTC date (daily) and UTC month (monthly) and tracked
/// independently; exceeding either blocks further paid calls for the scope
/// until rollover produces a fresh key. Updates are additive only.
pub struct CostLedger {
    budget: BudgetConfig,
    buckets: Mutex<HashMap<(String, String), UsageTotals>>,
}

impl CostLedger {
    pub fn new(budget: BudgetConfig) -> Self {
        Self {
            budget,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Add one call's usage to the scope's current daily and monthly buckets
    pub async fn record_usage(
        &self,
        scope: &Scope,
        input_tokens: u64,
        output_tokens: u64,
        cost_cents: f64,
    ) {
        self.record_usage_at(scope, input_tokens, output_tokens, cost_cents, Utc::now())
            .await;
    }

    /// As [`record_usage`](Self::record_usage), at an explicit instant, so
    /// period rollover is deterministic to exercise
    pub async fn record_usage_at(
        &self,
        scope: &Scope,
        input_tokens: u64,
        output_tokens: u64,
        cost_cents: f64,
        now: DateTime<Utc>,
    ) {
        let mut buckets = self.buckets.lock().await;

        for period in [daily_key(now), monthly_key(now)] {
            let totals = buckets
                .entry((scope.key(), period))
                .or_default();
            totals.input_tokens += input_tokens;
            totals.output_tokens += output_tokens;
            totals.total_cost_cents += cost_cents;
        }

        info!(
            "Usage recorded for {}: {} in / {} out tokens, {:.3}¢",
            scope.key(),
            input_tokens,
            output_tokens,
            cost_cents
        );
    }

    /// Pre-call gate: the worst status across the scope's daily and monthly
    /// periods
    pub async fn check_limit(&self, scope: &Scope) -> LimitStatus {
        self.check_limit_at(scope, Utc::now()).await
    }

    pub async fn check_limit_at(&self, scope: &Scope, now: DateTime<Utc>) -> LimitStatus {
        let (daily_limit, monthly_limit) = match scope {
            Scope::Session(_) => (
                self.budget.session_daily_limit_cents,
                self.budget.session_monthly_limit_cents,
            ),
            Scope::User(_) => (
                self.budget.user_daily_limit_cents,
                self.budget.user_monthly_limit_cents,
            ),
        };

        let buckets = self.buckets.lock().await;

        let spent = |period: String| {
            buckets
                .get(&(scope.key(), period))
                .map(|t| t.total_cost_cents)
                .unwrap_or(0.0)
        };

        let daily = self.status_for(spent(daily_key(now)), daily_limit);
        let monthly = self.status_for(spent(monthly_key(now)), monthly_limit);
        let status = daily.max(monthly);

        if status >= LimitStatus::Critical {
            warn!("Budget status for {}: {:?}", scope.key(), status);
        }

        status
    }

    /// Current usage for a scope's daily period, for status reporting
    pub async fn daily_totals(&self, scope: &Scope) -> UsageTotals {
        let buckets = self.buckets.lock().await;
        buckets
            .get(&(scope.key(), daily_key(Utc::now())))
            .cloned()
            .unwrap_or_default()
    }

    fn status_for(&self, spent_cents: f64, limit_cents: f64) -> LimitStatus {
        if limit_cents <= 0.0 {
            return LimitStatus::Ok;
        }
        let ratio = spent_cents / limit_cents;

        if ratio >= 1.0 {
            LimitStatus::Exceeded
        } else if ratio >= self.budget.critical_ratio {
            LimitStatus::Critical
        } else if ratio >= self.budget.warning_ratio {
            LimitStatus::Warning
        } else {
            LimitStatus::Ok
        }
    }
}

fn daily_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn monthly_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}
