mod adoption;
mod cohort;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::config::WindowParams;
use crate::error::Result;
use crate::util::time::resolve_window;
use adoption_core::TimeRange;

pub use adoption::{AdoptionService, SubjectAssessment};
pub use cohort::{CohortReport, CohortService};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub adoption: AdoptionService,
    pub cohort: CohortService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            adoption: AdoptionService::new(shared.clone()),
            cohort: CohortService::new(shared),
        }
    }
}

fn resolve_configured_window(config: &SharedConfig, params: &WindowParams) -> Result<TimeRange> {
    let mut params = params.clone();
    if params.window.is_none() && params.start.is_none() {
        params.window = Some(config.default_window.clone());
    }
    resolve_window(&params)
}
