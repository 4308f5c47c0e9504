use serde::{Deserialize, Serialize};

/// How deeply a subject has integrated AI coding tools into their workflow.
///
/// Variants are ordered; the ordering drives next-stage and progress math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStage {
    Exploring,
    BuildingMomentum,
    InFlow,
    PowerUser,
}

impl AdoptionStage {
    /// All stages in ascending order.
    pub const ALL: [AdoptionStage; 4] = [
        AdoptionStage::Exploring,
        AdoptionStage::BuildingMomentum,
        AdoptionStage::InFlow,
        AdoptionStage::PowerUser,
    ];

    /// Tokens-per-day floor a subject must average to qualify for this stage.
    pub fn threshold(&self) -> f64 {
        match self {
            AdoptionStage::Exploring => 0.0,
            AdoptionStage::BuildingMomentum => 250_000.0,
            AdoptionStage::InFlow => 1_000_000.0,
            AdoptionStage::PowerUser => 3_000_000.0,
        }
    }

    /// Minimum distinct active days required to qualify for this stage.
    /// Keeps a single heavy day from classifying a barely-active subject.
    pub fn min_days_active(&self) -> u32 {
        match self {
            AdoptionStage::Exploring => 0,
            AdoptionStage::BuildingMomentum => 2,
            AdoptionStage::InFlow => 3,
            AdoptionStage::PowerUser => 3,
        }
    }

    /// The next higher stage, if any.
    pub fn next(&self) -> Option<AdoptionStage> {
        match self {
            AdoptionStage::Exploring => Some(AdoptionStage::BuildingMomentum),
            AdoptionStage::BuildingMomentum => Some(AdoptionStage::InFlow),
            AdoptionStage::InFlow => Some(AdoptionStage::PowerUser),
            AdoptionStage::PowerUser => None,
        }
    }
}
