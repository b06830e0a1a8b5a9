//! Types for the search orchestrator.

use serde::Serialize;
use thiserror::Error;

use crate::error::FailureKind;
use crate::location::{DenialReason, LocationFix};
use crate::search::{SearchMode, SearchState, SearchValidationError, LOCATION_UNAVAILABLE_MESSAGE};

/// Orchestrator phase.
///
/// `AwaitingLocation -> Ready -> Searching -> (Succeeded | Failed)`, and from
/// either outcome back to `Searching` on the next submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingLocation,
    Ready,
    Searching,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::AwaitingLocation => "awaiting_location",
            Phase::Ready => "ready",
            Phase::Searching => "searching",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }

    /// Whether a new search may be submitted.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Succeeded | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the picker should be on screen, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum PickerDemand {
    Closed,
    /// Automatic acquisition failed; the picker is the only way forward.
    Required(DenialReason),
    /// The user asked to change location.
    Requested,
}

impl PickerDemand {
    pub fn is_open(&self) -> bool {
        !matches!(self, PickerDemand::Closed)
    }
}

/// What happened to a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The search ran to completion; carries the resulting state.
    Completed(SearchState),
    /// A search was already in flight; nothing was sent.
    AlreadySearching,
    /// The orchestrator was detached before the response arrived; the
    /// response was dropped.
    Discarded,
}

/// A submit rejected before anything was sent. State is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{}", LOCATION_UNAVAILABLE_MESSAGE)]
    LocationUnavailable,

    #[error(transparent)]
    Validation(#[from] SearchValidationError),
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitError::LocationUnavailable => FailureKind::LocationUnavailable,
            SubmitError::Validation(_) => FailureKind::ValidationFailure,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no search results to select from")]
    NoResults,

    #[error("hospital '{0}' was not among the presented results")]
    UnknownHospital(String),

    #[error("{}", LOCATION_UNAVAILABLE_MESSAGE)]
    LocationUnavailable,
}

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorStatus {
    pub phase: Phase,
    pub mode: SearchMode,
    pub location: Option<LocationFix>,
    pub picker: PickerDemand,
    pub submit_enabled: bool,
    pub result_count: usize,
    pub attached: bool,
}
