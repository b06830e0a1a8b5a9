use crate::location::Coordinate;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Service URLs are absolute http(s) URLs
/// - Timeouts are not 0
/// - Fixed location is complete and in range
/// - Picker centre is in range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_url("api.base_url", &config.api.base_url)?;
    validate_url("geocoder.base_url", &config.geocoder.base_url)?;

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.geocoder.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "geocoder.timeout_secs cannot be 0".to_string(),
        ));
    }

    Coordinate::from_parts(config.location.latitude, config.location.longitude)
        .map_err(|e| ConfigError::ValidationError(format!("location: {}", e)))?;

    config
        .picker
        .center()
        .map_err(|e| ConfigError::ValidationError(format!("picker centre: {}", e)))?;

    Ok(())
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            key, other
        ))),
    }
}
