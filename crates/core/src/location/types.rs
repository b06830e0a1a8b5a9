//! Types for the location pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used whenever a place name cannot be determined.
pub const CURRENT_LOCATION: &str = "Current Location";

/// Rejected coordinate input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    #[error("latitude and longitude must be set together")]
    PartiallySet,
}

/// A WGS84 latitude/longitude pair.
///
/// Both components are always present; an absent location is modelled as
/// `Option<Coordinate>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from two optional halves.
    ///
    /// Returns `Ok(None)` when both are absent and an error when only one is set.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoordinateError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(CoordinateError::PartiallySet),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Human-readable name for a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceLabel(String);

impl PlaceLabel {
    /// Create a label, falling back to the sentinel when blank.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Self::current_location()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The "Current Location" sentinel.
    pub fn current_location() -> Self {
        Self(CURRENT_LOCATION.to_string())
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == CURRENT_LOCATION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlaceLabel {
    fn default() -> Self {
        Self::current_location()
    }
}

impl std::fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A coordinate together with its place label.
///
/// Always replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub place: PlaceLabel,
}

impl LocationFix {
    pub fn new(coordinate: Coordinate, place: PlaceLabel) -> Self {
        Self { coordinate, place }
    }
}

/// Why automatic acquisition produced no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The platform has no position capability.
    Unsupported,
    /// The user refused the permission prompt.
    PermissionDenied,
    /// No fix arrived before the deadline.
    Timeout,
    /// The capability reported an error of its own.
    Unavailable,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DenialReason::Unsupported => "unsupported",
            DenialReason::PermissionDenied => "permission_denied",
            DenialReason::Timeout => "timeout",
            DenialReason::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Result of a single acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    Acquired(Coordinate),
    Denied(DenialReason),
}
