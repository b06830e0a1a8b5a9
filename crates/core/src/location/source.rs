//! Device position acquisition.

use async_trait::async_trait;

use crate::config::LocationConfig;

use super::types::{Coordinate, DenialReason, LocationOutcome};

/// A single-shot position capability.
///
/// Implementations never fail: every problem (missing capability, refused
/// permission, timeout) is reported as `LocationOutcome::Denied`.
#[async_trait]
pub trait CoordinateSource: Send + Sync {
    /// Make one acquisition attempt.
    async fn acquire(&self) -> LocationOutcome;

    /// Name of this source, for logs.
    fn source_name(&self) -> &'static str;
}

/// Source that reports a configured position.
pub struct FixedCoordinateSource {
    coordinate: Coordinate,
}

impl FixedCoordinateSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl CoordinateSource for FixedCoordinateSource {
    async fn acquire(&self) -> LocationOutcome {
        LocationOutcome::Acquired(self.coordinate)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// Source for platforms without any position capability.
pub struct UnsupportedCoordinateSource;

impl UnsupportedCoordinateSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedCoordinateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoordinateSource for UnsupportedCoordinateSource {
    async fn acquire(&self) -> LocationOutcome {
        LocationOutcome::Denied(DenialReason::Unsupported)
    }

    fn source_name(&self) -> &'static str {
        "unsupported"
    }
}

/// Factory function to create a coordinate source from config.
///
/// A configured latitude/longitude pair yields a fixed source; otherwise the
/// platform is treated as having no capability and the picker takes over.
pub fn create_coordinate_source(config: &LocationConfig) -> Box<dyn CoordinateSource> {
    match config.fixed_coordinate() {
        Some(coordinate) => Box::new(FixedCoordinateSource::new(coordinate)),
        None => Box::new(UnsupportedCoordinateSource::new()),
    }
}
