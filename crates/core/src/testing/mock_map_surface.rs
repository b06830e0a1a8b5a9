//! Mock map surface for testing.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::location::Coordinate;
use crate::picker::{MapError, MapId, MapSurface, MapView};

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    live: HashSet<MapId>,
    mounts: usize,
    fail_next_mount: bool,
    last_view: Option<MapView>,
    last_marker: Option<Coordinate>,
}

/// Records map lifecycle calls so tests can check that nothing leaks.
#[derive(Debug, Default)]
pub struct MockMapSurface {
    state: Mutex<SurfaceState>,
}

impl MockMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of maps mounted and not yet released.
    pub fn live_maps(&self) -> usize {
        self.state().live.len()
    }

    pub fn mount_count(&self) -> usize {
        self.state().mounts
    }

    pub fn fail_next_mount(&self) {
        self.state().fail_next_mount = true;
    }

    pub fn last_view(&self) -> Option<MapView> {
        self.state().last_view
    }

    pub fn last_marker(&self) -> Option<Coordinate> {
        self.state().last_marker
    }
}

impl MapSurface for MockMapSurface {
    fn mount(&self, view: MapView) -> Result<MapId, MapError> {
        let mut state = self.state();
        if std::mem::take(&mut state.fail_next_mount) {
            return Err(MapError::Unavailable("mock mount failure".to_string()));
        }
        state.next_id += 1;
        let id = MapId(state.next_id);
        state.live.insert(id);
        state.mounts += 1;
        state.last_view = Some(view);
        Ok(id)
    }

    fn set_view(&self, _id: MapId, view: MapView) {
        self.state().last_view = Some(view);
    }

    fn set_marker(&self, _id: MapId, position: Coordinate) {
        self.state().last_marker = Some(position);
    }

    fn release(&self, id: MapId) {
        self.state().live.remove(&id);
    }
}
