use serde::{Deserialize, Serialize};

use crate::aggregate::{UsageSample, aggregate_metrics};
use crate::config::WindowParams;
use crate::error::{AppError, Result};
use crate::services::{SharedConfig, resolve_configured_window};
use crate::util::time::window_end_date;
use adoption_core::{AdoptionMetrics, StageAssessment, TimeRange};

/// One subject's aggregated metrics and classification over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAssessment {
    pub subject: String,
    pub window: TimeRange,
    pub metrics: AdoptionMetrics,
    pub assessment: StageAssessment,
}

#[derive(Clone)]
pub struct AdoptionService {
    config: SharedConfig,
}

impl AdoptionService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Classify a ready-made metrics record.
    pub fn assess(&self, metrics: &AdoptionMetrics) -> StageAssessment {
        adoption_core::assess(metrics)
    }

    /// Aggregate one subject's raw samples over the resolved window, then
    /// classify. Samples belonging to other subjects are ignored.
    pub fn assess_samples(
        &self,
        subject: &str,
        samples: &[UsageSample],
        params: &WindowParams,
    ) -> Result<SubjectAssessment> {
        let window = resolve_configured_window(&self.config, params)?;
        let as_of = window_end_date(&window)?;
        let own: Vec<UsageSample> = samples
            .iter()
            .filter(|sample| sample.subject == subject)
            .cloned()
            .collect();
        if own.is_empty() {
            return Err(AppError::NotFound(format!("subject {} not found", subject)));
        }
        let metrics = aggregate_metrics(&own, &window, as_of)?;
        Ok(SubjectAssessment {
            subject: subject.to_string(),
            window,
            assessment: adoption_core::assess(&metrics),
            metrics,
        })
    }
}
