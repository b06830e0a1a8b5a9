pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod feedback;
pub mod location;
pub mod metrics;
pub mod orchestrator;
pub mod picker;
pub mod presenter;
pub mod search;
pub mod testing;

pub use api::ApiClient;
pub use auth::{
    open_session, AuthClient, AuthError, AuthService, ClinicalProfile, Credentials,
    RegistrationForm, Role, SessionStore,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use error::{FailureKind, ServiceError};
pub use feedback::{FeedbackClient, FeedbackCollector, FeedbackModal, FeedbackRecord};
pub use location::{
    create_coordinate_source, Coordinate, CoordinateSource, LocationFix, NominatimClient,
    PlaceLabel, PlaceResolver,
};
pub use orchestrator::{OrchestratorConfig, Phase, SearchOrchestrator, SubmitOutcome};
pub use picker::{HeadlessMap, LocationPicker, MapSurface};
pub use search::{BloodType, FormInput, HospitalRecommendation, SearchMode, SearchState};
