//! Geocoding collaborator contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Coordinate;

/// Errors that can occur when talking to a geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Forward search produced no candidates.
    #[error("No match for '{0}'")]
    NoMatch(String),
}

/// Address fields returned by a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
}

impl Address {
    /// Most specific settlement name: city, then town, then village.
    ///
    /// Blank fields are skipped.
    pub fn locality(&self) -> Option<&str> {
        [&self.city, &self.town, &self.village]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// Trait for forward and reverse geocoding backends.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the address at a coordinate.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Address, GeocodeError>;

    /// Search for a place by name. Candidates are ordered by relevance.
    async fn search(&self, query: &str) -> Result<Vec<Coordinate>, GeocodeError>;
}
