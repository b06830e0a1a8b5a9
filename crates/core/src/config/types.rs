use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::location::{Coordinate, CoordinateError};
use crate::search::BloodType;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Hospital recommendation service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Service URL (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_api_timeout() -> u64 {
    30
}

/// Forward/reverse geocoding service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    /// User-Agent string (required by Nominatim's usage policy).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum spacing between requests in milliseconds (default: 1100).
    #[serde(default = "default_rate_limit")]
    pub rate_limit_ms: u64,
    /// Country restriction for place searches. Blank disables it.
    #[serde(default = "default_country")]
    pub country: Option<String>,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            rate_limit_ms: default_rate_limit(),
            country: default_country(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("HemaRoute/{}", env!("CARGO_PKG_VERSION"))
}

fn default_rate_limit() -> u64 {
    1100
}

fn default_country() -> Option<String> {
    Some("india".to_string())
}

fn default_geocoder_timeout() -> u64 {
    15
}

/// Device position settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Fixed latitude reported as the device position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Fixed longitude reported as the device position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Acquisition deadline in milliseconds (default: 10000).
    #[serde(default = "default_location_timeout")]
    pub timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            timeout_ms: default_location_timeout(),
        }
    }
}

fn default_location_timeout() -> u64 {
    10_000
}

impl LocationConfig {
    /// The configured position, if both halves are present and valid.
    pub fn fixed_coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
            .ok()
            .flatten()
    }
}

/// Manual location picker settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PickerConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
    /// Zoom applied after a successful place search.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            initial_zoom: default_initial_zoom(),
            focus_zoom: default_focus_zoom(),
        }
    }
}

impl PickerConfig {
    pub fn center(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::new(self.center_latitude, self.center_longitude)
    }
}

fn default_center_latitude() -> f64 {
    20.5937
}

fn default_center_longitude() -> f64 {
    78.9629
}

fn default_initial_zoom() -> u8 {
    5
}

fn default_focus_zoom() -> u8 {
    13
}

/// Search defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    /// City paired with prompt searches before any form search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_city: Option<String>,
    #[serde(default)]
    pub default_blood_type: BloodType,
}

/// Feedback modal settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackConfig {
    /// How long the confirmation stays visible before closing (default: 2000).
    #[serde(default = "default_confirmation")]
    pub confirmation_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            confirmation_ms: default_confirmation(),
        }
    }
}

fn default_confirmation() -> u64 {
    2000
}

/// Session persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
    /// Whether unauthenticated emergency access is honoured.
    #[serde(default = "default_emergency_bypass")]
    pub emergency_bypass: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
            emergency_bypass: default_emergency_bypass(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from("hemaroute-session.json")
}

fn default_emergency_bypass() -> bool {
    true
}
