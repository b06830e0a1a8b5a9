use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use hemaroute_core::{
    create_coordinate_source, open_session, ApiClient, AuthService, Config, CoordinateSource,
    FeedbackCollector, HeadlessMap, LocationPicker, MapSurface, NominatimClient,
    OrchestratorConfig, PlaceResolver, SearchOrchestrator, SessionStore,
};
use hemaroute_core::picker::PickerError;

/// Collaborators shared by every command.
pub struct AppState {
    config: Config,
    session: Arc<SessionStore>,
    api: Arc<ApiClient>,
    geocoder: Arc<NominatimClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let session = open_session(&config.session);
        let api = Arc::new(
            ApiClient::new(&config.api, Arc::clone(&session))
                .context("Failed to create API client")?,
        );
        let geocoder = Arc::new(
            NominatimClient::new(&config.geocoder).context("Failed to create geocoder")?,
        );

        Ok(Self {
            config,
            session,
            api,
            geocoder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.api) as _, Arc::clone(&self.session))
    }

    pub fn orchestrator(&self) -> SearchOrchestrator {
        let source: Arc<dyn CoordinateSource> =
            Arc::from(create_coordinate_source(&self.config.location));
        SearchOrchestrator::new(
            OrchestratorConfig::from(&self.config),
            source,
            PlaceResolver::new(Arc::clone(&self.geocoder) as _),
            Arc::clone(&self.api) as _,
        )
    }

    pub fn open_picker(&self) -> Result<LocationPicker, PickerError> {
        let surface: Arc<dyn MapSurface> = Arc::new(HeadlessMap::new());
        LocationPicker::open(
            surface,
            Arc::clone(&self.geocoder) as _,
            &self.config.picker,
        )
    }

    pub fn feedback_collector(&self) -> FeedbackCollector {
        FeedbackCollector::new(
            Arc::clone(&self.api) as _,
            Duration::from_millis(self.config.feedback.confirmation_ms),
        )
    }
}
