use crate::services::AppServices;
use crate::util::time::DEFAULT_WINDOW;

/// Defaults applied when a caller leaves the observation window unspecified.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub default_window: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_window: DEFAULT_WINDOW.to_string(),
        }
    }
}

/// Application state shared by frontend backends (CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }
}
