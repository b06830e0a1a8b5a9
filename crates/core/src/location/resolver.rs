//! Best-effort coordinate to place-name resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FailureKind;
use crate::metrics;

use super::geocoder::Geocoder;
use super::types::{Coordinate, PlaceLabel};

/// Turns coordinates into place labels via a reverse geocoder.
///
/// Never fails: any geocoding problem yields the "Current Location" sentinel.
#[derive(Clone)]
pub struct PlaceResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl PlaceResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, coordinate: Coordinate) -> PlaceLabel {
        match self.geocoder.reverse(coordinate).await {
            Ok(address) => match address.locality() {
                Some(name) => {
                    debug!(%coordinate, place = name, "Resolved place");
                    PlaceLabel::new(name)
                }
                None => {
                    debug!(%coordinate, "Reverse lookup returned no locality");
                    metrics::PLACE_FALLBACKS.inc();
                    PlaceLabel::current_location()
                }
            },
            Err(e) => {
                warn!(%coordinate, kind = %FailureKind::GeocodeFailure, "Reverse geocoding failed: {}", e);
                metrics::record_failure(FailureKind::GeocodeFailure);
                metrics::PLACE_FALLBACKS.inc();
                PlaceLabel::current_location()
            }
        }
    }
}
