//! Helpfulness feedback for a selected recommendation.
//!
//! Feedback is fire-and-forget with respect to the search flow: it never
//! touches orchestrator state, and a lost rating never blocks the user.

mod modal;
mod types;

pub use modal::{FeedbackCollector, FeedbackModal};
pub use types::*;

use async_trait::async_trait;

use crate::error::ServiceError;

/// Trait for the remote feedback sink.
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), ServiceError>;
}
