//! Mock feedback sink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::feedback::{FeedbackClient, FeedbackRecord};

/// Records every submission, including ones that are made to fail.
pub struct MockFeedbackClient {
    submissions: Arc<RwLock<Vec<FeedbackRecord>>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
}

impl Default for MockFeedbackClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedbackClient {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn submissions(&self) -> Vec<FeedbackRecord> {
        self.submissions.read().await.clone()
    }

    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait]
impl FeedbackClient for MockFeedbackClient {
    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), ServiceError> {
        self.submissions.write().await.push(record.clone());
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
