//! Map surface abstraction and its scoped handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::location::Coordinate;

/// Identifier of a mounted map instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapId(pub u64);

/// Camera position of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map surface unavailable: {0}")]
    Unavailable(String),
}

/// A rendering surface able to host interactive maps.
///
/// Every successful `mount` must be paired with exactly one `release`;
/// `MapHandle` guarantees this.
pub trait MapSurface: Send + Sync {
    fn mount(&self, view: MapView) -> Result<MapId, MapError>;

    fn set_view(&self, id: MapId, view: MapView);

    /// Show the single selection marker, replacing any previous one.
    fn set_marker(&self, id: MapId, position: Coordinate);

    fn release(&self, id: MapId);
}

/// Owned map instance, released on drop.
pub struct MapHandle {
    surface: Arc<dyn MapSurface>,
    id: MapId,
}

impl MapHandle {
    pub fn mount(surface: Arc<dyn MapSurface>, view: MapView) -> Result<Self, MapError> {
        let id = surface.mount(view)?;
        debug!(map_id = id.0, "Mounted map");
        Ok(Self { surface, id })
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn set_view(&self, view: MapView) {
        self.surface.set_view(self.id, view);
    }

    pub fn set_marker(&self, position: Coordinate) {
        self.surface.set_marker(self.id, position);
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        debug!(map_id = self.id.0, "Releasing map");
        self.surface.release(self.id);
    }
}

/// Surface with no visual output, for terminal use.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_id: AtomicU64,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapSurface for HeadlessMap {
    fn mount(&self, view: MapView) -> Result<MapId, MapError> {
        let id = MapId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(map_id = id.0, center = %view.center, zoom = view.zoom, "Headless map mounted");
        Ok(id)
    }

    fn set_view(&self, id: MapId, view: MapView) {
        debug!(map_id = id.0, center = %view.center, zoom = view.zoom, "Headless map view");
    }

    fn set_marker(&self, id: MapId, position: Coordinate) {
        debug!(map_id = id.0, %position, "Headless map marker");
    }

    fn release(&self, _id: MapId) {}
}
