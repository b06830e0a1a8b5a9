//! Hospital search: request/response types and the ranking-service contract.

mod query;
mod types;

pub use query::{compose_form_query, form_query, prompt_query};
pub use types::*;

use async_trait::async_trait;

use crate::error::ServiceError;

/// Trait for the remote hospital ranking service.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Submit a search. The returned order is the service's ranking and must
    /// be kept as-is. An empty list is a valid answer.
    async fn recommend(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<HospitalRecommendation>, ServiceError>;
}
