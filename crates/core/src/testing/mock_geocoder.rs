//! Mock geocoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::location::{Address, Coordinate, GeocodeError, Geocoder};

/// Mock implementation of the Geocoder trait.
///
/// Reverse lookups return the configured address (empty by default).
/// Forward searches return the candidates registered for the exact query,
/// or nothing.
pub struct MockGeocoder {
    address: Arc<RwLock<Address>>,
    places: Arc<RwLock<HashMap<String, Vec<Coordinate>>>>,
    reverse_calls: Arc<RwLock<Vec<Coordinate>>>,
    search_calls: Arc<RwLock<Vec<String>>>,
    /// If set, the next call (either direction) fails with this error.
    next_error: Arc<RwLock<Option<GeocodeError>>>,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            address: Arc::new(RwLock::new(Address::default())),
            places: Arc::new(RwLock::new(HashMap::new())),
            reverse_calls: Arc::new(RwLock::new(Vec::new())),
            search_calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_address(&self, address: Address) {
        *self.address.write().await = address;
    }

    /// Register search candidates for a query.
    pub async fn add_place(&self, query: &str, candidates: Vec<Coordinate>) {
        self.places
            .write()
            .await
            .insert(query.to_string(), candidates);
    }

    pub async fn set_next_error(&self, error: GeocodeError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn reverse_count(&self) -> usize {
        self.reverse_calls.read().await.len()
    }

    pub async fn search_count(&self) -> usize {
        self.search_calls.read().await.len()
    }

    pub async fn recorded_searches(&self) -> Vec<String> {
        self.search_calls.read().await.clone()
    }

    async fn take_error(&self) -> Option<GeocodeError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Address, GeocodeError> {
        self.reverse_calls.write().await.push(coordinate);
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self.address.read().await.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        self.search_calls.write().await.push(query.to_string());
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self
            .places
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}
