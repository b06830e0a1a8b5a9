//! Manual location picker.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PickerConfig;
use crate::error::FailureKind;
use crate::location::{Coordinate, GeocodeError, Geocoder, LocationFix, PlaceLabel};
use crate::metrics;

use super::map::{MapError, MapHandle, MapSurface, MapView};

/// Shown when confirming without a chosen point.
pub const NO_SELECTION_MESSAGE: &str = "Please select a location on the map";

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("{}", NO_SELECTION_MESSAGE)]
    NoSelection,

    #[error("place search query is empty")]
    EmptyQuery,

    #[error("no place found for '{0}'")]
    NoMatch(String),

    #[error("place search failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("picker is closed")]
    Closed,

    #[error(transparent)]
    Map(#[from] MapError),
}

impl PickerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PickerError::NoSelection | PickerError::EmptyQuery | PickerError::Closed => {
                FailureKind::ValidationFailure
            }
            PickerError::NoMatch(_) | PickerError::Geocode(_) | PickerError::Map(_) => {
                FailureKind::GeocodeFailure
            }
        }
    }
}

/// An open picker surface.
///
/// The underlying map lives exactly as long as the picker is open: confirm,
/// cancel and drop all release it.
pub struct LocationPicker {
    geocoder: Arc<dyn Geocoder>,
    map: Option<MapHandle>,
    focus_zoom: u8,
    marker: Option<Coordinate>,
    pending_label: Option<String>,
}

impl LocationPicker {
    /// Mount a map centred per config and open the picker.
    pub fn open(
        surface: Arc<dyn MapSurface>,
        geocoder: Arc<dyn Geocoder>,
        config: &PickerConfig,
    ) -> Result<Self, PickerError> {
        let center = config.center().map_err(|e| MapError::Unavailable(e.to_string()))?;
        let map = MapHandle::mount(
            surface,
            MapView {
                center,
                zoom: config.initial_zoom,
            },
        )?;

        info!("Location picker opened");
        Ok(Self {
            geocoder,
            map: Some(map),
            focus_zoom: config.focus_zoom,
            marker: None,
            pending_label: None,
        })
    }

    pub fn is_open(&self) -> bool {
        self.map.is_some()
    }

    /// The currently marked point, if any.
    pub fn selection(&self) -> Option<Coordinate> {
        self.marker
    }

    fn map(&self) -> Result<&MapHandle, PickerError> {
        self.map.as_ref().ok_or(PickerError::Closed)
    }

    /// Look up a place by name and mark the first candidate.
    ///
    /// On failure the previous selection is kept.
    pub async fn search_place(&mut self, query: &str) -> Result<Coordinate, PickerError> {
        self.map()?;
        let query = query.trim();
        if query.is_empty() {
            return Err(PickerError::EmptyQuery);
        }

        let candidates = self.geocoder.search(query).await.map_err(|e| {
            warn!(kind = %FailureKind::GeocodeFailure, "Place search failed: {}", e);
            metrics::record_failure(FailureKind::GeocodeFailure);
            PickerError::from(e)
        })?;

        let Some(first) = candidates.into_iter().next() else {
            debug!("No place found for '{}'", query);
            return Err(PickerError::NoMatch(query.to_string()));
        };

        // The picker may have been closed while the lookup was in flight.
        let map = self.map()?;
        map.set_view(MapView {
            center: first,
            zoom: self.focus_zoom,
        });
        map.set_marker(first);
        self.marker = Some(first);
        self.pending_label = Some(query.to_string());
        debug!(position = %first, "Place search selected '{}'", query);
        Ok(first)
    }

    /// Mark a point chosen directly on the map.
    ///
    /// Clears any label remembered from an earlier place search.
    pub fn select(&mut self, position: Coordinate) -> Result<(), PickerError> {
        self.map()?.set_marker(position);
        self.marker = Some(position);
        self.pending_label = None;
        Ok(())
    }

    /// Confirm the marked point and close the picker.
    ///
    /// Without a selection this fails and the picker stays open.
    pub fn confirm(&mut self) -> Result<LocationFix, PickerError> {
        self.map()?;
        let coordinate = self.marker.ok_or(PickerError::NoSelection)?;
        let place = self
            .pending_label
            .take()
            .map(PlaceLabel::new)
            .unwrap_or_else(PlaceLabel::current_location);

        self.close();
        metrics::LOCATION_OUTCOMES.with_label_values(&["picked"]).inc();
        info!(%coordinate, %place, "Location confirmed");
        Ok(LocationFix::new(coordinate, place))
    }

    /// Close without choosing.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("Location picker cancelled");
        }
        self.close();
    }

    fn close(&mut self) {
        self.map = None;
        self.marker = None;
        self.pending_label = None;
    }
}
