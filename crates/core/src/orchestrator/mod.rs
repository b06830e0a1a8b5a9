//! Location & search orchestrator.
//!
//! A typed state machine over the location fix and the search lifecycle,
//! testable without any rendering surface:
//! - **Location**: one automatic attempt, falling back to the picker on denial
//! - **Search**: one request in flight at most, guarded by the phase
//! - **Results**: kept until the next submit replaces them

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::SearchOrchestrator;
pub use types::{
    OrchestratorStatus, Phase, PickerDemand, SelectionError, SubmitError, SubmitOutcome,
};
