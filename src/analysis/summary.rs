use super::record::AnalysisRecord;
use serde::{Deserialize, Serialize};

/// Score bucket cutoffs for the distribution
const EXCELLENT_MIN: f64 = 85.0;
const GOOD_MIN: f64 = 70.0;
const FAIR_MIN: f64 = 55.0;

/// Readiness cutoffs
const READY_MIN: f64 = 80.0;
const NEEDS_PRACTICE_MIN: f64 = 60.0;

/// Interview-readiness verdict from the average overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessLevel {
    Ready,
    NeedsPractice,
    SignificantImprovement,
}

/// How the per-question overall scores bucket out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub needs_improvement: usize,
}

/// Session-level aggregation over all per-question records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub question_count: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub distribution: ScoreDistribution,
    pub readiness: ReadinessLevel,

    /// Total paid cost of the session's scoring, in cents
    pub total_cost_cents: f64,

    /// How many questions were scored by the heuristic fallback
    pub fallback_scored: usize,
}

impl SessionSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        if records.is_empty() {
            return Self {
                question_count: 0,
                average_score: 0.0,
                median_score: 0.0,
                distribution: ScoreDistribution::default(),
                readiness: ReadinessLevel::SignificantImprovement,
                total_cost_cents: 0.0,
                fallback_scored: 0,
            };
        }

        let mut overalls: Vec<f64> = records.iter().map(|r| r.scores.overall()).collect();
        overalls.sort_by(|a, b| a.total_cmp(b));

        let average = overalls.iter().sum::<f64>() / overalls.len() as f64;
        let median = if overalls.len() % 2 == 1 {
            overalls[overalls.len() / 2]
        } else {
            let hi = overalls.len() / 2;
            (overalls[hi - 1] + overalls[hi]) / 2.0
        };

        let mut distribution = ScoreDistribution::default();
        for score in &overalls {
            if *score >= EXCELLENT_MIN {
                distribution.excellent += 1;
            } else if *score >= GOOD_MIN {
                distribution.good += 1;
            } else if *score >= FAIR_MIN {
                distribution.fair += 1;
            } else {
                distribution.needs_improvement += 1;
            }
        }

        let readiness = if average >= READY_MIN {
            ReadinessLevel::Ready
        } else if average >= NEEDS_PRACTICE_MIN {
            ReadinessLevel::NeedsPractice
        } else {
            ReadinessLevel::SignificantImprovement
        };

        Self {
            question_count: records.len(),
            average_score: average,
            median_score: median,
            distribution,
            readiness,
            total_cost_cents: records.iter().map(|r| r.cost_cents).sum(),
            fallback_scored: records
                .iter()
                .filter(|r| r.model_used == super::fallback::FALLBACK_MODEL_ID)
                .count(),
        }
    }
}
