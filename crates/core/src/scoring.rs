use serde::{Deserialize, Serialize};

use crate::AdoptionMetrics;
use crate::stage::AdoptionStage;

/// Days without usage before a subject is flagged inactive.
pub const INACTIVITY_THRESHOLD_DAYS: u32 = 30;

/// Tokens-per-day ceiling that progress is measured against past the top stage.
pub const PROGRESS_CEILING_TOKENS_PER_DAY: f64 = 10_000_000.0;

// Intensity maps log10(tokens/day) onto [0, 80]: 10^4/day scores zero,
// saturating at roughly 10^7/day.
const INTENSITY_MAX_POINTS: f64 = 80.0;
const INTENSITY_LOG_OFFSET: f64 = 4.0;
const INTENSITY_LOG_SCALE: f64 = 26.67;

// Recency contributes up to 20 points, decaying linearly to zero over 14 days.
const RECENCY_MAX_POINTS: f64 = 20.0;
const RECENCY_WINDOW_DAYS: f64 = 14.0;

/// Everything the scorer derives for one subject. Computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageAssessment {
    pub score: u8,
    pub stage: AdoptionStage,
    pub is_inactive: bool,
    pub progress_to_next_stage: f64,
    pub tokens_to_next_stage: Option<f64>,
}

/// Per-stage subject counts for a cohort, with the inactivity overlay tallied
/// separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDistribution {
    pub exploring: u64,
    pub building_momentum: u64,
    pub in_flow: u64,
    pub power_user: u64,
    pub inactive: u64,
    pub total: u64,
}

/// Engagement score in [0, 100]: intensity (0-80) plus recency (0-20).
pub fn compute_score(metrics: &AdoptionMetrics) -> u8 {
    if metrics.days_active == 0 {
        return 0;
    }
    let intensity = intensity_points(metrics.avg_tokens_per_day());
    let recency = recency_points(metrics.days_since_last_active);
    (intensity + recency).clamp(0.0, 100.0).round() as u8
}

fn intensity_points(avg_tokens_per_day: f64) -> f64 {
    if avg_tokens_per_day <= 0.0 {
        return 0.0;
    }
    ((avg_tokens_per_day.log10() - INTENSITY_LOG_OFFSET) * INTENSITY_LOG_SCALE)
        .clamp(0.0, INTENSITY_MAX_POINTS)
}

fn recency_points(days_since_last_active: u32) -> f64 {
    (RECENCY_MAX_POINTS
        - days_since_last_active as f64 * (RECENCY_MAX_POINTS / RECENCY_WINDOW_DAYS))
        .clamp(0.0, RECENCY_MAX_POINTS)
}

/// Highest stage whose tokens-per-day floor AND days-active floor are both met.
pub fn compute_stage(metrics: &AdoptionMetrics) -> AdoptionStage {
    if metrics.days_active == 0 {
        return AdoptionStage::Exploring;
    }
    let avg = metrics.avg_tokens_per_day();
    for stage in [
        AdoptionStage::PowerUser,
        AdoptionStage::InFlow,
        AdoptionStage::BuildingMomentum,
    ] {
        if avg >= stage.threshold() && metrics.days_active >= stage.min_days_active() {
            return stage;
        }
    }
    AdoptionStage::Exploring
}

/// Inactivity is an overlay on the stage, not a demotion: an inactive
/// power user stays a power user.
pub fn is_inactive(days_since_last_active: u32) -> bool {
    days_since_last_active >= INACTIVITY_THRESHOLD_DAYS
}

/// Linear position in [0, 100] between the current stage floor and the next
/// one. Past the top stage, measured against the extended tokens/day ceiling.
pub fn progress_to_next_stage(metrics: &AdoptionMetrics) -> f64 {
    if metrics.days_active == 0 {
        return 0.0;
    }
    let avg = metrics.avg_tokens_per_day();
    let stage = compute_stage(metrics);
    let floor = stage.threshold();
    let ceiling = match stage.next() {
        Some(next) => next.threshold(),
        None => PROGRESS_CEILING_TOKENS_PER_DAY,
    };
    ((avg - floor) / (ceiling - floor) * 100.0).clamp(0.0, 100.0)
}

/// Average tokens/day still needed to reach the next stage floor. `None` once
/// at the top stage; a subject with no activity owes the full first floor.
pub fn tokens_to_next_stage(metrics: &AdoptionMetrics) -> Option<f64> {
    if metrics.days_active == 0 {
        return Some(AdoptionStage::BuildingMomentum.threshold());
    }
    let next = compute_stage(metrics).next()?;
    Some((next.threshold() - metrics.avg_tokens_per_day()).max(0.0))
}

/// One-call bundle of every derived value for a subject.
pub fn assess(metrics: &AdoptionMetrics) -> StageAssessment {
    StageAssessment {
        score: compute_score(metrics),
        stage: compute_stage(metrics),
        is_inactive: is_inactive(metrics.days_since_last_active),
        progress_to_next_stage: progress_to_next_stage(metrics),
        tokens_to_next_stage: tokens_to_next_stage(metrics),
    }
}

/// Fold per-subject assessments into a cohort stage distribution.
pub fn stage_distribution<'a, I>(assessments: I) -> StageDistribution
where
    I: IntoIterator<Item = &'a StageAssessment>,
{
    let mut distribution = StageDistribution::default();
    for assessment in assessments {
        match assessment.stage {
            AdoptionStage::Exploring => distribution.exploring += 1,
            AdoptionStage::BuildingMomentum => distribution.building_momentum += 1,
            AdoptionStage::InFlow => distribution.in_flow += 1,
            AdoptionStage::PowerUser => distribution.power_user += 1,
        }
        if assessment.is_inactive {
            distribution.inactive += 1;
        }
        distribution.total += 1;
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total_tokens: u64, days_active: u32, days_since_last_active: u32) -> AdoptionMetrics {
        AdoptionMetrics {
            total_tokens,
            days_active,
            days_since_last_active,
        }
    }

    #[test]
    fn zero_activity_scores_zero_and_stays_exploring() {
        let m = metrics(0, 0, 90);
        assert_eq!(compute_score(&m), 0);
        assert_eq!(compute_stage(&m), AdoptionStage::Exploring);
        assert_eq!(progress_to_next_stage(&m), 0.0);
        assert!(is_inactive(m.days_since_last_active));
    }

    #[test]
    fn in_flow_subject_scores_seventy_three() {
        // 5M tokens over 5 days, active today: avg 1M/day.
        let m = metrics(5_000_000, 5, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::InFlow);
        assert_eq!(compute_score(&m), 73);
    }

    #[test]
    fn single_light_day_stays_exploring_at_forty_seven() {
        // 100k tokens in one day sits below the building_momentum floor.
        let m = metrics(100_000, 1, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::Exploring);
        assert_eq!(compute_score(&m), 47);
    }

    #[test]
    fn power_user_boundary_is_inclusive() {
        // 9M over 3 days lands exactly on the 3M/day floor.
        let m = metrics(9_000_000, 3, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::PowerUser);
    }

    #[test]
    fn days_active_floor_gates_heavy_single_days() {
        // 3M/day average but only 2 active days: power_user needs 3.
        let m = metrics(6_000_000, 2, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::BuildingMomentum);
    }

    #[test]
    fn intensity_saturates_at_eighty_points() {
        // 20M/day is past the saturation point; recency adds the other 20.
        let m = metrics(200_000_000, 10, 0);
        assert_eq!(compute_score(&m), 100);
    }

    #[test]
    fn recency_decays_to_zero_by_day_fourteen() {
        let fresh = metrics(5_000_000, 5, 0);
        let stale = metrics(5_000_000, 5, 14);
        assert_eq!(compute_score(&fresh), 73);
        assert_eq!(compute_score(&stale), 53);
    }

    #[test]
    fn inactivity_overlay_does_not_demote_stage() {
        let m = metrics(50_000_000, 10, 35);
        assert_eq!(compute_stage(&m), AdoptionStage::PowerUser);
        assert!(is_inactive(m.days_since_last_active));
    }

    #[test]
    fn inactivity_threshold_is_thirty_days() {
        assert!(!is_inactive(29));
        assert!(is_inactive(30));
        assert!(is_inactive(35));
    }

    #[test]
    fn progress_interpolates_between_stage_floors() {
        // in_flow at 2M/day: halfway from the 1M floor to the 3M floor.
        let m = metrics(10_000_000, 5, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::InFlow);
        assert!((progress_to_next_stage(&m) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn progress_past_top_stage_uses_extended_ceiling() {
        // power_user at 6.5M/day: halfway from 3M to the 10M ceiling.
        let m = metrics(32_500_000, 5, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::PowerUser);
        assert!((progress_to_next_stage(&m) - 50.0).abs() < 1e-9);

        let maxed = metrics(100_000_000, 5, 0);
        assert_eq!(progress_to_next_stage(&maxed), 100.0);
    }

    #[test]
    fn exploring_above_first_floor_clamps_progress() {
        // One 600k day: floors keep the stage at exploring, progress caps out.
        let m = metrics(600_000, 1, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::Exploring);
        assert_eq!(progress_to_next_stage(&m), 100.0);
    }

    #[test]
    fn tokens_to_next_stage_at_exact_floor_is_zero() {
        let m = metrics(250_000, 1, 0);
        assert_eq!(compute_stage(&m), AdoptionStage::Exploring);
        assert_eq!(tokens_to_next_stage(&m), Some(0.0));
    }

    #[test]
    fn tokens_to_next_stage_reports_remaining_average() {
        let m = metrics(5_000_000, 5, 0);
        assert_eq!(tokens_to_next_stage(&m), Some(2_000_000.0));
    }

    #[test]
    fn tokens_to_next_stage_is_none_at_top() {
        let m = metrics(50_000_000, 10, 0);
        assert_eq!(tokens_to_next_stage(&m), None);
    }

    #[test]
    fn tokens_to_next_stage_from_floor_state_is_first_threshold() {
        let m = metrics(0, 0, 7);
        assert_eq!(tokens_to_next_stage(&m), Some(250_000.0));
    }

    #[test]
    fn assess_bundles_all_derived_values() {
        let m = metrics(5_000_000, 5, 35);
        let assessment = assess(&m);
        assert_eq!(assessment.score, compute_score(&m));
        assert_eq!(assessment.stage, AdoptionStage::InFlow);
        assert!(assessment.is_inactive);
        assert_eq!(assessment.progress_to_next_stage, progress_to_next_stage(&m));
        assert_eq!(assessment.tokens_to_next_stage, Some(2_000_000.0));
    }

    #[test]
    fn stage_distribution_counts_stages_and_overlay() {
        let assessments = [
            assess(&metrics(0, 0, 90)),
            assess(&metrics(100_000, 1, 0)),
            assess(&metrics(1_000_000, 2, 0)),
            assess(&metrics(5_000_000, 5, 0)),
            assess(&metrics(50_000_000, 10, 35)),
        ];
        let distribution = stage_distribution(&assessments);
        assert_eq!(distribution.exploring, 2);
        assert_eq!(distribution.building_momentum, 1);
        assert_eq!(distribution.in_flow, 1);
        assert_eq!(distribution.power_user, 1);
        assert_eq!(distribution.inactive, 2);
        assert_eq!(distribution.total, 5);
    }

    #[test]
    fn assessment_serializes_with_wire_stage_label() {
        let assessment = assess(&metrics(5_000_000, 5, 0));
        let json = serde_json::to_string(&assessment).expect("serialize assessment");
        assert!(json.contains("\"stage\":\"in_flow\""));
        assert!(json.contains("\"score\":73"));
        assert!(json.contains("\"is_inactive\":false"));
    }
}
