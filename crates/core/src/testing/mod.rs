//! Testing utilities and mock collaborators.
//!
//! Every external seam of the orchestrator (positioning, geocoding, map
//! rendering, the ranking service, feedback and accounts) has a mock here so
//! the full flow can be driven without a network or a display.
//!
//! # Example
//!
//! ```rust,ignore
//! use hemaroute_core::testing::{fixtures, MockCoordinateSource, MockRecommendationClient};
//!
//! let source = MockCoordinateSource::acquired(fixtures::delhi());
//! let client = MockRecommendationClient::new();
//! client.set_results(vec![fixtures::hospital("AIIMS", 4.6, 3.2)]).await;
//! ```

mod mock_auth_client;
mod mock_coordinate_source;
mod mock_feedback_client;
mod mock_geocoder;
mod mock_map_surface;
mod mock_recommendation_client;

pub use mock_auth_client::MockAuthClient;
pub use mock_coordinate_source::MockCoordinateSource;
pub use mock_feedback_client::MockFeedbackClient;
pub use mock_geocoder::MockGeocoder;
pub use mock_map_surface::MockMapSurface;
pub use mock_recommendation_client::MockRecommendationClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::location::{Address, Coordinate};
    use crate::search::HospitalRecommendation;

    /// A recommendation with plausible capacity figures.
    pub fn hospital(name: &str, rating: f64, distance_km: f64) -> HospitalRecommendation {
        HospitalRecommendation {
            name: name.to_string(),
            rating,
            response_time_minutes: 12.0,
            icu_beds: 8,
            blood_units: 25,
            distance_km,
            explanation: format!("{} has ICU capacity and matching blood stock.", name),
        }
    }

    /// Three ranked results, best first.
    pub fn ranked_hospitals() -> Vec<HospitalRecommendation> {
        vec![
            hospital("AIIMS Trauma Centre", 4.6, 3.2),
            hospital("Safdarjung Hospital", 4.1, 4.8),
            hospital("Max Super Speciality", 4.4, 9.5),
        ]
    }

    pub fn delhi() -> Coordinate {
        Coordinate::new(28.6139, 77.2090).expect("valid coordinate")
    }

    pub fn pune() -> Coordinate {
        Coordinate::new(18.5204, 73.8567).expect("valid coordinate")
    }

    /// Address carrying only a town name.
    pub fn town_address(town: &str) -> Address {
        Address {
            town: Some(town.to_string()),
            ..Address::default()
        }
    }

    pub fn city_address(city: &str) -> Address {
        Address {
            city: Some(city.to_string()),
            ..Address::default()
        }
    }
}
