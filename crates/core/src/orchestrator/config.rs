//! Orchestrator configuration.

use std::time::Duration;

use crate::config::Config;
use crate::search::BloodType;

/// Runtime settings for the search orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on one position acquisition; exceeding it counts as a
    /// denial.
    pub location_timeout: Duration,

    /// City paired with prompt searches before any form search.
    pub default_city: Option<String>,

    /// Blood type paired with prompt searches before any form search.
    pub default_blood_type: BloodType,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            location_timeout: Duration::from_millis(10_000),
            default_city: None,
            default_blood_type: BloodType::default(),
        }
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            location_timeout: Duration::from_millis(config.location.timeout_ms),
            default_city: config
                .search
                .default_city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            default_blood_type: config.search.default_blood_type,
        }
    }
}
