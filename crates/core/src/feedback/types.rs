//! Types for hospital feedback.

use serde::Serialize;
use thiserror::Error;

use crate::location::Coordinate;
use crate::search::HospitalRecommendation;

/// Shown when submitting without choosing yes or no.
pub const NO_RATING_MESSAGE: &str = "Please select Yes or No";

/// Shown after every submission, delivered or not.
pub const CONFIRMATION_MESSAGE: &str = "Thank You! Your feedback helps us improve recommendations.";

/// A hospital the user picked from the presented results.
///
/// Only the orchestrator can create one, so feedback always refers to a
/// recommendation that was actually shown.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalSelection {
    recommendation: HospitalRecommendation,
    coordinate: Coordinate,
}

impl HospitalSelection {
    pub(crate) fn new(recommendation: HospitalRecommendation, coordinate: Coordinate) -> Self {
        Self {
            recommendation,
            coordinate,
        }
    }

    pub fn recommendation(&self) -> &HospitalRecommendation {
        &self.recommendation
    }

    pub fn hospital_name(&self) -> &str {
        &self.recommendation.name
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// A single helpfulness rating, discarded after acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub hospital_name: String,
    pub helpful: bool,
    pub comment: String,
    pub coordinate: Coordinate,
}

/// Rejected feedback operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("{}", NO_RATING_MESSAGE)]
    NoRatingSelected,

    #[error("feedback already submitted")]
    AlreadySubmitted,

    #[error("feedback modal is closed")]
    Closed,
}

/// Result of a submission as seen by the user.
///
/// `delivered` is false when the service call failed; the user sees the
/// same confirmation either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackReceipt {
    pub delivered: bool,
}

/// Lifecycle of one feedback modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalStatus {
    Editing,
    Submitting,
    Confirmed,
    Closed,
}
