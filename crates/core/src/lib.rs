mod scoring;
mod stage;

pub use scoring::{
    INACTIVITY_THRESHOLD_DAYS, PROGRESS_CEILING_TOKENS_PER_DAY, StageAssessment,
    StageDistribution, assess, compute_score, compute_stage, is_inactive, progress_to_next_stage,
    stage_distribution, tokens_to_next_stage,
};
pub use stage::AdoptionStage;

use serde::{Deserialize, Serialize};

/// Aggregate usage metrics for one subject over an observation window.
///
/// The token-summing policy (input/output/cache) belongs to whoever produced
/// the aggregate; the scorer only sees the totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionMetrics {
    pub total_tokens: u64,
    pub days_active: u32,
    pub days_since_last_active: u32,
}

impl AdoptionMetrics {
    /// Average tokens per active day. Zero when no activity was recorded.
    pub fn avg_tokens_per_day(&self) -> f64 {
        if self.days_active == 0 {
            return 0.0;
        }
        self.total_tokens as f64 / self.days_active as f64
    }
}

/// Half-open observation window as RFC3339 UTC timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}
