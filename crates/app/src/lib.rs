pub mod aggregate;
pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod util;

pub use aggregate::{UsageSample, aggregate_by_subject, aggregate_metrics};
pub use app::{AppConfig, AppState};
pub use config::WindowParams;
pub use error::{AppError, Result};
pub use services::{AdoptionService, AppServices, CohortReport, CohortService, SubjectAssessment};
pub use util::time::{normalize_rfc3339_to_utc, resolve_window};
