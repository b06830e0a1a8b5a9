//! Feedback modal: one rating for one selected hospital.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::FailureKind;
use crate::metrics;

use super::types::{
    FeedbackError, FeedbackReceipt, FeedbackRecord, HospitalSelection, ModalStatus,
};
use super::FeedbackClient;

/// Opens feedback modals with shared client and timing.
#[derive(Clone)]
pub struct FeedbackCollector {
    client: Arc<dyn FeedbackClient>,
    confirmation: Duration,
}

impl FeedbackCollector {
    pub fn new(client: Arc<dyn FeedbackClient>, confirmation: Duration) -> Self {
        Self {
            client,
            confirmation,
        }
    }

    pub fn open(&self, selection: HospitalSelection) -> FeedbackModal {
        FeedbackModal {
            client: Arc::clone(&self.client),
            confirmation: self.confirmation,
            selection,
            helpful: None,
            comment: String::new(),
            status: ModalStatus::Editing,
        }
    }
}

/// An open feedback modal.
///
/// At most one submission is ever sent per modal. Delivery failures are
/// logged and otherwise invisible: the modal confirms and closes as usual.
pub struct FeedbackModal {
    client: Arc<dyn FeedbackClient>,
    confirmation: Duration,
    selection: HospitalSelection,
    helpful: Option<bool>,
    comment: String,
    status: ModalStatus,
}

impl FeedbackModal {
    pub fn hospital_name(&self) -> &str {
        self.selection.hospital_name()
    }

    pub fn status(&self) -> ModalStatus {
        self.status
    }

    pub fn helpful(&self) -> Option<bool> {
        self.helpful
    }

    pub fn set_helpful(&mut self, helpful: bool) {
        if self.status == ModalStatus::Editing {
            self.helpful = Some(helpful);
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        if self.status == ModalStatus::Editing {
            self.comment = comment.into();
        }
    }

    pub async fn submit(&mut self) -> Result<FeedbackReceipt, FeedbackError> {
        match self.status {
            ModalStatus::Editing => {}
            ModalStatus::Closed => return Err(FeedbackError::Closed),
            ModalStatus::Submitting | ModalStatus::Confirmed => {
                return Err(FeedbackError::AlreadySubmitted)
            }
        }
        let helpful = self.helpful.ok_or(FeedbackError::NoRatingSelected)?;

        self.status = ModalStatus::Submitting;
        let record = FeedbackRecord {
            hospital_name: self.selection.hospital_name().to_string(),
            helpful,
            comment: self.comment.clone(),
            coordinate: self.selection.coordinate(),
        };

        let delivered = match self.client.submit_feedback(&record).await {
            Ok(()) => {
                info!(hospital = %record.hospital_name, helpful, "Feedback delivered");
                metrics::FEEDBACK_SUBMISSIONS
                    .with_label_values(&["delivered"])
                    .inc();
                true
            }
            Err(e) => {
                warn!(
                    hospital = %record.hospital_name,
                    kind = %FailureKind::FeedbackSubmissionFailure,
                    "Feedback submission failed: {}",
                    e
                );
                metrics::FEEDBACK_SUBMISSIONS.with_label_values(&["lost"]).inc();
                metrics::record_failure(FailureKind::FeedbackSubmissionFailure);
                false
            }
        };

        self.status = ModalStatus::Confirmed;
        Ok(FeedbackReceipt { delivered })
    }

    /// Keep the confirmation visible for the configured time, then close.
    pub async fn close_after_confirmation(&mut self) {
        if self.status == ModalStatus::Confirmed && !self.confirmation.is_zero() {
            tokio::time::sleep(self.confirmation).await;
        }
        self.status = ModalStatus::Closed;
    }

    /// Close without sending anything.
    pub fn cancel(&mut self) {
        self.status = ModalStatus::Closed;
    }
}
