//! Mock ranking service for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, Notify, RwLock};

use crate::error::ServiceError;
use crate::search::{HospitalRecommendation, RecommendationClient, SearchRequest};

/// Mock implementation of the RecommendationClient trait.
///
/// Calls can be held open with [`hold`](Self::hold) so tests can observe the
/// orchestrator while a search is in flight, then let go with
/// [`release`](Self::release).
pub struct MockRecommendationClient {
    results: Arc<RwLock<Vec<HospitalRecommendation>>>,
    requests: Arc<RwLock<Vec<SearchRequest>>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    held: watch::Sender<bool>,
    entered: Arc<Notify>,
}

impl Default for MockRecommendationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecommendationClient {
    pub fn new() -> Self {
        let (held, _) = watch::channel(false);
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            held,
            entered: Arc::new(Notify::new()),
        }
    }

    pub async fn set_results(&self, results: Vec<HospitalRecommendation>) {
        *self.results.write().await = results;
    }

    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Block subsequent calls until `release` is called.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Wait until a call has reached the service.
    pub async fn wait_for_call(&self) {
        self.entered.notified().await;
    }

    pub async fn recorded_requests(&self) -> Vec<SearchRequest> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl RecommendationClient for MockRecommendationClient {
    async fn recommend(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<HospitalRecommendation>, ServiceError> {
        self.requests.write().await.push(request.clone());
        self.entered.notify_one();

        let mut held = self.held.subscribe();
        // The sender lives as long as self, so this only ends when released.
        let _ = held.wait_for(|held| !*held).await;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(self.results.read().await.clone())
    }
}
