//! Mock coordinate source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::location::{Coordinate, CoordinateSource, DenialReason, LocationOutcome};

/// Coordinate source with a scripted outcome and optional latency.
pub struct MockCoordinateSource {
    outcome: Arc<RwLock<LocationOutcome>>,
    delay: Arc<RwLock<Option<Duration>>>,
    acquisitions: Arc<RwLock<usize>>,
}

impl MockCoordinateSource {
    pub fn new(outcome: LocationOutcome) -> Self {
        Self {
            outcome: Arc::new(RwLock::new(outcome)),
            delay: Arc::new(RwLock::new(None)),
            acquisitions: Arc::new(RwLock::new(0)),
        }
    }

    pub fn acquired(coordinate: Coordinate) -> Self {
        Self::new(LocationOutcome::Acquired(coordinate))
    }

    pub fn denied(reason: DenialReason) -> Self {
        Self::new(LocationOutcome::Denied(reason))
    }

    pub async fn set_outcome(&self, outcome: LocationOutcome) {
        *self.outcome.write().await = outcome;
    }

    /// Make every acquisition take this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn acquire_count(&self) -> usize {
        *self.acquisitions.read().await
    }
}

#[async_trait]
impl CoordinateSource for MockCoordinateSource {
    async fn acquire(&self) -> LocationOutcome {
        *self.acquisitions.write().await += 1;
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        *self.outcome.read().await
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}
