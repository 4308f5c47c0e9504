use serde::{Deserialize, Serialize};

use crate::aggregate::{UsageSample, aggregate_by_subject};
use crate::config::WindowParams;
use crate::error::Result;
use crate::services::{SharedConfig, SubjectAssessment, resolve_configured_window};
use crate::util::time::window_end_date;
use adoption_core::{StageDistribution, TimeRange, stage_distribution};

/// Cohort-level view: every subject's assessment plus the stage rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortReport {
    pub window: TimeRange,
    pub subjects: Vec<SubjectAssessment>,
    pub distribution: StageDistribution,
}

#[derive(Clone)]
pub struct CohortService {
    config: SharedConfig,
}

impl CohortService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Classify every subject present in the sample stream over the resolved
    /// window. Subjects come back sorted by name.
    pub fn assess_cohort(
        &self,
        samples: &[UsageSample],
        params: &WindowParams,
    ) -> Result<CohortReport> {
        let window = resolve_configured_window(&self.config, params)?;
        let as_of = window_end_date(&window)?;
        let by_subject = aggregate_by_subject(samples, &window, as_of)?;
        let subjects: Vec<SubjectAssessment> = by_subject
            .into_iter()
            .map(|(subject, metrics)| SubjectAssessment {
                subject,
                window: window.clone(),
                assessment: adoption_core::assess(&metrics),
                metrics,
            })
            .collect();
        let distribution =
            stage_distribution(subjects.iter().map(|subject| &subject.assessment));
        Ok(CohortReport {
            window,
            subjects,
            distribution,
        })
    }
}
