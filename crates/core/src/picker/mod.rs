//! Interactive fallback for choosing a location by hand.
//!
//! Used whenever automatic acquisition is denied, or when the user asks to
//! change location. A confirmed pick replaces the orchestrator's coordinate
//! and place label together.

mod map;
mod session;

pub use map::{HeadlessMap, MapError, MapHandle, MapId, MapSurface, MapView};
pub use session::{LocationPicker, PickerError, NO_SELECTION_MESSAGE};
