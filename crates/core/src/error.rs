//! Failure classification shared across components.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised by a remote HTTP collaborator (ranking, feedback, auth).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (connect, timeout, DNS).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The service answered with a non-success status.
    #[error("service rejected request ({status}){}", detail_suffix(.detail))]
    ServiceRejected { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ServiceError {
    /// Detail text supplied by the service, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ServiceError::ServiceRejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Detail text when present, otherwise the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// The failure categories surfaced by the application.
///
/// Used as a log field and as the `kind` label on failure metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    LocationUnavailable,
    GeocodeFailure,
    SearchFailure,
    EmptyResults,
    FeedbackSubmissionFailure,
    AuthFailure,
    ValidationFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::LocationUnavailable => "location_unavailable",
            FailureKind::GeocodeFailure => "geocode_failure",
            FailureKind::SearchFailure => "search_failure",
            FailureKind::EmptyResults => "empty_results",
            FailureKind::FeedbackSubmissionFailure => "feedback_submission_failure",
            FailureKind::AuthFailure => "auth_failure",
            FailureKind::ValidationFailure => "validation_failure",
        }
    }

    /// Whether this failure blocks the primary flow.
    ///
    /// Enrichment failures (geocoding, feedback) and informational outcomes
    /// never do.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            FailureKind::SearchFailure | FailureKind::AuthFailure | FailureKind::ValidationFailure
        )
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::ServiceRejected {
            status: 401,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "service rejected request (401): Invalid credentials"
        );

        let err = ServiceError::ServiceRejected {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "service rejected request (500)");
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ServiceError::ServiceRejected {
            status: 400,
            detail: Some("Unknown city".to_string()),
        };
        assert_eq!(err.user_message("Failed to fetch hospitals."), "Unknown city");

        let err = ServiceError::NetworkFailure("connection refused".to_string());
        assert_eq!(
            err.user_message("Failed to fetch hospitals."),
            "Failed to fetch hospitals."
        );
    }

    #[test]
    fn test_failure_kind_blocking() {
        assert!(FailureKind::SearchFailure.is_blocking());
        assert!(FailureKind::AuthFailure.is_blocking());
        assert!(!FailureKind::GeocodeFailure.is_blocking());
        assert!(!FailureKind::FeedbackSubmissionFailure.is_blocking());
        assert!(!FailureKind::EmptyResults.is_blocking());
    }

    #[test]
    fn test_failure_kind_serialization() {
        let json = serde_json::to_string(&FailureKind::EmptyResults).unwrap();
        assert_eq!(json, "\"empty_results\"");
        assert_eq!(FailureKind::EmptyResults.to_string(), "empty_results");
    }
}
