//! Location pipeline: position acquisition and place-name resolution.
//!
//! A `CoordinateSource` makes a single acquisition attempt; a
//! `PlaceResolver` turns the coordinate into a label via a `Geocoder`
//! (Nominatim in production). Both are best-effort: denial and geocoding
//! failures are normal outcomes, never errors.

mod geocoder;
mod nominatim;
mod resolver;
mod source;
mod types;

pub use geocoder::{Address, GeocodeError, Geocoder};
pub use nominatim::NominatimClient;
pub use resolver::PlaceResolver;
pub use source::{
    create_coordinate_source, CoordinateSource, FixedCoordinateSource,
    UnsupportedCoordinateSource,
};
pub use types::*;
