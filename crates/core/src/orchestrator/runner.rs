//! Search orchestrator implementation.
//!
//! Owns the location fix, the active search surface and the search state.
//! The phase guard is the only mutual exclusion: while `Searching`, further
//! submits are ignored, so at most one recommendation request is ever in
//! flight per instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::FailureKind;
use crate::feedback::HospitalSelection;
use crate::location::{
    CoordinateSource, DenialReason, LocationFix, LocationOutcome, PlaceResolver,
};
use crate::metrics;
use crate::search::{
    form_query, prompt_query, BloodType, FormInput, RecommendationClient, SearchMode,
    SearchRequest, SearchState, SearchValidationError, SEARCH_FAILED_MESSAGE,
};

use super::config::OrchestratorConfig;
use super::types::{
    OrchestratorStatus, Phase, PickerDemand, SelectionError, SubmitError, SubmitOutcome,
};

#[derive(Debug)]
struct OrchestratorState {
    phase: Phase,
    location: Option<LocationFix>,
    picker: PickerDemand,
    mode: SearchMode,
    prompt: String,
    form: FormInput,
    /// City and blood type of the last form search, reused by prompt mode.
    last_city: Option<String>,
    last_blood_type: BloodType,
    search: SearchState,
}

impl OrchestratorState {
    fn new(config: &OrchestratorConfig) -> Self {
        Self {
            phase: Phase::AwaitingLocation,
            location: None,
            picker: PickerDemand::Closed,
            mode: SearchMode::default(),
            prompt: String::new(),
            form: FormInput {
                blood_type: config.default_blood_type,
                ..FormInput::default()
            },
            last_city: config.default_city.clone(),
            last_blood_type: config.default_blood_type,
            search: SearchState::idle(),
        }
    }

    /// Build the request for the active mode from the current drafts.
    fn build_request(&self, fix: &LocationFix) -> Result<SearchRequest, SearchValidationError> {
        match self.mode {
            SearchMode::Prompt => {
                let query = prompt_query(&self.prompt)?;
                let city = self
                    .last_city
                    .clone()
                    .or_else(|| (!fix.place.is_sentinel()).then(|| fix.place.to_string()))
                    .ok_or(SearchValidationError::MissingCity)?;
                SearchRequest::new(&city, self.last_blood_type, query, fix.coordinate)
            }
            SearchMode::Form => {
                let query = form_query(&self.form)?;
                SearchRequest::new(&self.form.city, self.form.blood_type, query, fix.coordinate)
            }
        }
    }

    fn enter_ready(&mut self) {
        if self.phase == Phase::AwaitingLocation {
            self.phase = Phase::Ready;
        }
    }
}

/// The search orchestrator.
///
/// Cheap to clone; clones share state. Call [`detach`](Self::detach) when the
/// owning view goes away so late responses are dropped instead of applied.
#[derive(Clone)]
pub struct SearchOrchestrator {
    config: OrchestratorConfig,
    source: Arc<dyn CoordinateSource>,
    resolver: PlaceResolver,
    client: Arc<dyn RecommendationClient>,
    state: Arc<RwLock<OrchestratorState>>,
    attached: Arc<AtomicBool>,
}

impl SearchOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        source: Arc<dyn CoordinateSource>,
        resolver: PlaceResolver,
        client: Arc<dyn RecommendationClient>,
    ) -> Self {
        let state = OrchestratorState::new(&config);
        Self {
            config,
            source,
            resolver,
            client,
            state: Arc::new(RwLock::new(state)),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Try automatic acquisition once.
    ///
    /// On success the place is resolved and the fix applied. On denial (or
    /// when acquisition exceeds the configured timeout) the picker becomes
    /// required and `None` is returned.
    pub async fn locate(&self) -> Option<LocationFix> {
        debug!(source = self.source.source_name(), "Acquiring location");
        let outcome = match tokio::time::timeout(self.config.location_timeout, self.source.acquire())
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => LocationOutcome::Denied(DenialReason::Timeout),
        };

        match outcome {
            LocationOutcome::Acquired(coordinate) => {
                metrics::LOCATION_OUTCOMES
                    .with_label_values(&["acquired"])
                    .inc();
                let place = self.resolver.resolve(coordinate).await;
                let fix = LocationFix::new(coordinate, place);

                if !self.is_attached() {
                    debug!("Detached during location acquisition, dropping fix");
                    return None;
                }
                let mut state = self.state.write().await;
                state.location = Some(fix.clone());
                state.picker = PickerDemand::Closed;
                state.enter_ready();
                info!(%coordinate, place = %fix.place, phase = %state.phase, "Location acquired");
                Some(fix)
            }
            LocationOutcome::Denied(reason) => {
                let reason_label = reason.to_string();
                metrics::LOCATION_OUTCOMES
                    .with_label_values(&[reason_label.as_str()])
                    .inc();
                metrics::record_failure(FailureKind::LocationUnavailable);
                warn!(
                    %reason,
                    kind = %FailureKind::LocationUnavailable,
                    "Location unavailable, picker required"
                );

                if self.is_attached() {
                    let mut state = self.state.write().await;
                    state.picker = PickerDemand::Required(reason);
                    if state.location.is_none() {
                        state.phase = Phase::AwaitingLocation;
                    }
                }
                None
            }
        }
    }

    /// Ask for the picker so the user can change location.
    pub async fn request_location_change(&self) {
        let mut state = self.state.write().await;
        if state.picker == PickerDemand::Closed {
            state.picker = PickerDemand::Requested;
            debug!("Location change requested");
        }
    }

    /// Replace coordinate and place together with a confirmed pick.
    pub async fn apply_location(&self, fix: LocationFix) {
        let mut state = self.state.write().await;
        info!(coordinate = %fix.coordinate, place = %fix.place, "Location applied");
        state.location = Some(fix);
        state.picker = PickerDemand::Closed;
        state.enter_ready();
    }

    /// Close the picker without a pick. Without a location the orchestrator
    /// keeps awaiting one.
    pub async fn dismiss_picker(&self) {
        let mut state = self.state.write().await;
        state.picker = PickerDemand::Closed;
        debug!(phase = %state.phase, "Picker dismissed");
    }

    /// Switch the active search surface. Location and results are kept.
    pub async fn select_mode(&self, mode: SearchMode) {
        let mut state = self.state.write().await;
        if state.mode != mode {
            debug!(from = state.mode.as_str(), to = mode.as_str(), "Search mode changed");
            state.mode = mode;
        }
    }

    pub async fn update_prompt(&self, text: impl Into<String>) {
        self.state.write().await.prompt = text.into();
    }

    pub async fn update_form(&self, form: FormInput) {
        self.state.write().await.form = form;
    }

    /// Submit the active mode's draft.
    ///
    /// While a search is in flight this is a no-op returning
    /// `AlreadySearching`. Validation and missing-location failures leave all
    /// state unchanged. Drafts are kept after every submit.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let (request, mode) = {
            let mut state = self.state.write().await;
            if state.phase == Phase::Searching {
                debug!("Search already in flight, ignoring submit");
                return Ok(SubmitOutcome::AlreadySearching);
            }
            let mode = state.mode;
            if !self.is_attached() {
                debug!("Orchestrator detached, not dispatching search");
                metrics::SEARCHES
                    .with_label_values(&[mode.as_str(), "discarded"])
                    .inc();
                return Ok(SubmitOutcome::Discarded);
            }
            let Some(fix) = state.location.clone() else {
                metrics::SEARCHES
                    .with_label_values(&[mode.as_str(), "rejected"])
                    .inc();
                metrics::record_failure(FailureKind::LocationUnavailable);
                return Err(SubmitError::LocationUnavailable);
            };

            let request = match state.build_request(&fix) {
                Ok(request) => request,
                Err(e) => {
                    debug!(mode = mode.as_str(), "Search rejected: {}", e);
                    metrics::SEARCHES
                        .with_label_values(&[mode.as_str(), "rejected"])
                        .inc();
                    metrics::record_failure(FailureKind::ValidationFailure);
                    return Err(e.into());
                }
            };

            if mode == SearchMode::Form {
                state.last_city = Some(request.city().to_string());
                state.last_blood_type = request.blood_type();
            }
            state.phase = Phase::Searching;
            state.search = SearchState::loading();
            (request, mode)
        };

        let search_id = Uuid::new_v4();
        info!(
            %search_id,
            mode = mode.as_str(),
            city = request.city(),
            blood_type = request.blood_type().code(),
            "Search started"
        );

        let started = Instant::now();
        let result = self.client.recommend(&request).await;
        metrics::SEARCH_DURATION
            .with_label_values(&[mode.as_str()])
            .observe(started.elapsed().as_secs_f64());

        let mut state = self.state.write().await;
        if !self.is_attached() {
            info!(%search_id, "Orchestrator detached, discarding search response");
            metrics::SEARCHES
                .with_label_values(&[mode.as_str(), "discarded"])
                .inc();
            return Ok(SubmitOutcome::Discarded);
        }

        match result {
            Ok(results) => {
                let outcome = if results.is_empty() { "empty" } else { "success" };
                metrics::SEARCHES
                    .with_label_values(&[mode.as_str(), outcome])
                    .inc();
                metrics::SEARCH_RESULTS
                    .with_label_values(&[])
                    .observe(results.len() as f64);
                if results.is_empty() {
                    metrics::record_failure(FailureKind::EmptyResults);
                }
                info!(%search_id, results = results.len(), "Search succeeded");
                state.search = SearchState::succeeded(results);
                state.phase = Phase::Succeeded;
            }
            Err(e) => {
                let message = e.user_message(SEARCH_FAILED_MESSAGE);
                warn!(%search_id, kind = %FailureKind::SearchFailure, "Search failed: {}", e);
                metrics::SEARCHES
                    .with_label_values(&[mode.as_str(), "failed"])
                    .inc();
                metrics::record_failure(FailureKind::SearchFailure);
                state.search = SearchState::failed(message);
                state.phase = Phase::Failed;
            }
        }

        Ok(SubmitOutcome::Completed(state.search.clone()))
    }

    /// Switch to prompt mode, set the prompt and submit it.
    pub async fn submit_prompt(
        &self,
        text: impl Into<String>,
    ) -> Result<SubmitOutcome, SubmitError> {
        {
            let mut state = self.state.write().await;
            if state.phase == Phase::Searching {
                return Ok(SubmitOutcome::AlreadySearching);
            }
            state.mode = SearchMode::Prompt;
            state.prompt = text.into();
        }
        self.submit().await
    }

    /// Switch to form mode, set the form and submit it.
    pub async fn submit_form(&self, form: FormInput) -> Result<SubmitOutcome, SubmitError> {
        {
            let mut state = self.state.write().await;
            if state.phase == Phase::Searching {
                return Ok(SubmitOutcome::AlreadySearching);
            }
            state.mode = SearchMode::Form;
            state.form = form;
        }
        self.submit().await
    }

    /// Pick a presented hospital for feedback.
    pub async fn select_hospital(&self, name: &str) -> Result<HospitalSelection, SelectionError> {
        let state = self.state.read().await;
        if state.search.results().is_empty() {
            return Err(SelectionError::NoResults);
        }
        let recommendation = state
            .search
            .find(name)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownHospital(name.to_string()))?;
        let fix = state
            .location
            .as_ref()
            .ok_or(SelectionError::LocationUnavailable)?;
        Ok(HospitalSelection::new(recommendation, fix.coordinate))
    }

    /// Stop applying results. In-flight requests still complete but their
    /// responses are dropped.
    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            debug!("Search orchestrator detached");
        }
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    pub async fn search_state(&self) -> SearchState {
        self.state.read().await.search.clone()
    }

    pub async fn location(&self) -> Option<LocationFix> {
        self.state.read().await.location.clone()
    }

    pub async fn picker_demand(&self) -> PickerDemand {
        self.state.read().await.picker
    }

    pub async fn mode(&self) -> SearchMode {
        self.state.read().await.mode
    }

    pub async fn prompt(&self) -> String {
        self.state.read().await.prompt.clone()
    }

    pub async fn form(&self) -> FormInput {
        self.state.read().await.form.clone()
    }

    /// Whether the submit control should be enabled.
    pub async fn submit_enabled(&self) -> bool {
        self.state.read().await.phase.accepts_submit()
    }

    pub async fn status(&self) -> OrchestratorStatus {
        let state = self.state.read().await;
        OrchestratorStatus {
            phase: state.phase,
            mode: state.mode,
            location: state.location.clone(),
            picker: state.picker,
            submit_enabled: state.phase.accepts_submit(),
            result_count: state.search.results().len(),
            attached: self.is_attached(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::location::{Coordinate, PlaceLabel};
    use crate::search::{SearchPhase, NO_HOSPITALS_MESSAGE};
    use crate::testing::{fixtures, MockCoordinateSource, MockGeocoder, MockRecommendationClient};

    struct Harness {
        source: Arc<MockCoordinateSource>,
        geocoder: Arc<MockGeocoder>,
        client: Arc<MockRecommendationClient>,
        orchestrator: SearchOrchestrator,
    }

    impl Harness {
        fn new(source: MockCoordinateSource) -> Self {
            Self::with_config(source, OrchestratorConfig::default())
        }

        fn with_config(source: MockCoordinateSource, config: OrchestratorConfig) -> Self {
            let source = Arc::new(source);
            let geocoder = Arc::new(MockGeocoder::new());
            let client = Arc::new(MockRecommendationClient::new());
            let orchestrator = SearchOrchestrator::new(
                config,
                source.clone(),
                PlaceResolver::new(geocoder.clone()),
                client.clone(),
            );
            Self {
                source,
                geocoder,
                client,
                orchestrator,
            }
        }
    }

    fn form(city: &str) -> FormInput {
        FormInput {
            city: city.to_string(),
            blood_type: BloodType::BNegative,
            category: "accident".to_string(),
            details: String::new(),
        }
    }

    #[tokio::test]
    async fn test_starts_awaiting_location() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        assert_eq!(h.orchestrator.phase().await, Phase::AwaitingLocation);
        assert!(!h.orchestrator.submit_enabled().await);
        assert_eq!(h.orchestrator.mode().await, SearchMode::Prompt);
    }

    #[tokio::test]
    async fn test_locate_resolves_place() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.geocoder.set_address(fixtures::town_address("Test Town")).await;

        let fix = h.orchestrator.locate().await.unwrap();
        assert_eq!(fix.place.as_str(), "Test Town");
        assert_eq!(h.orchestrator.phase().await, Phase::Ready);
        assert_eq!(h.orchestrator.picker_demand().await, PickerDemand::Closed);
    }

    #[tokio::test]
    async fn test_locate_denied_requires_picker() {
        let h = Harness::new(MockCoordinateSource::denied(DenialReason::PermissionDenied));

        assert!(h.orchestrator.locate().await.is_none());
        assert_eq!(
            h.orchestrator.picker_demand().await,
            PickerDemand::Required(DenialReason::PermissionDenied)
        );
        assert_eq!(h.orchestrator.phase().await, Phase::AwaitingLocation);
        assert_eq!(h.geocoder.reverse_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_timeout_is_denial() {
        let source = MockCoordinateSource::acquired(fixtures::delhi());
        source.set_delay(std::time::Duration::from_secs(60)).await;
        let h = Harness::new(source);

        assert!(h.orchestrator.locate().await.is_none());
        assert_eq!(
            h.orchestrator.picker_demand().await,
            PickerDemand::Required(DenialReason::Timeout)
        );
        assert_eq!(h.source.acquire_count().await, 1);
    }

    #[tokio::test]
    async fn test_submit_without_location_is_rejected() {
        let h = Harness::new(MockCoordinateSource::denied(DenialReason::Unsupported));
        h.orchestrator.update_prompt("Trauma case with heavy bleeding").await;

        assert_eq!(
            h.orchestrator.submit().await,
            Err(SubmitError::LocationUnavailable)
        );
        assert_eq!(h.orchestrator.phase().await, Phase::AwaitingLocation);
        assert_eq!(h.client.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_form_submit_composes_query() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.client.set_results(fixtures::ranked_hospitals()).await;
        h.orchestrator.locate().await;

        let outcome = h.orchestrator.submit_form(form("Delhi")).await.unwrap();
        let SubmitOutcome::Completed(state) = outcome else {
            panic!("expected completed search");
        };
        assert_eq!(state.phase(), SearchPhase::Success);
        assert_eq!(state.results().len(), 3);
        assert_eq!(state.results()[0].name, "AIIMS Trauma Centre");

        let requests = h.client.recorded_requests().await;
        assert_eq!(
            requests[0].query(),
            "Emergency: accident - Patient blood type: blood_b_neg"
        );
        assert_eq!(requests[0].city(), "Delhi");
        assert_eq!(requests[0].coordinate(), fixtures::delhi());
        assert_eq!(h.orchestrator.phase().await, Phase::Succeeded);
    }

    #[tokio::test]
    async fn test_prompt_uses_last_form_defaults() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;
        h.orchestrator.submit_form(form("Jaipur")).await.unwrap();

        h.orchestrator
            .submit_prompt("Urgent accident needs O+ blood")
            .await
            .unwrap();

        let requests = h.client.recorded_requests().await;
        assert_eq!(requests[1].query(), "Urgent accident needs O+ blood");
        assert_eq!(requests[1].city(), "Jaipur");
        assert_eq!(requests[1].blood_type(), BloodType::BNegative);
    }

    #[tokio::test]
    async fn test_prompt_city_falls_back_to_place() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.geocoder.set_address(fixtures::city_address("New Delhi")).await;
        h.orchestrator.locate().await;

        h.orchestrator.submit_prompt("Need ICU").await.unwrap();
        let requests = h.client.recorded_requests().await;
        assert_eq!(requests[0].city(), "New Delhi");
        assert_eq!(requests[0].blood_type(), BloodType::OPositive);
    }

    #[tokio::test]
    async fn test_prompt_prefers_configured_city() {
        let config = OrchestratorConfig {
            default_city: Some("Chennai".to_string()),
            ..OrchestratorConfig::default()
        };
        let h = Harness::with_config(MockCoordinateSource::acquired(fixtures::delhi()), config);
        h.geocoder.set_address(fixtures::city_address("New Delhi")).await;
        h.orchestrator.locate().await;

        h.orchestrator.submit_prompt("Need ICU").await.unwrap();
        assert_eq!(h.client.recorded_requests().await[0].city(), "Chennai");
    }

    #[tokio::test]
    async fn test_prompt_without_any_city_is_validation_failure() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;

        let result = h.orchestrator.submit_prompt("Need ICU").await;
        assert_eq!(
            result,
            Err(SubmitError::Validation(SearchValidationError::MissingCity))
        );
        assert_eq!(h.orchestrator.phase().await, Phase::Ready);
        assert_eq!(h.orchestrator.prompt().await, "Need ICU");
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;

        let result = h.orchestrator.submit_prompt("   ").await;
        assert_eq!(
            result,
            Err(SubmitError::Validation(SearchValidationError::BlankPrompt))
        );
        assert_eq!(h.client.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_results_message() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;

        h.orchestrator.submit_form(form("Delhi")).await.unwrap();
        let state = h.orchestrator.search_state().await;
        assert_eq!(state.phase(), SearchPhase::Success);
        assert_eq!(state.message().unwrap().text(), NO_HOSPITALS_MESSAGE);
        assert!(!state.message().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_submit_after_detach_sends_nothing() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.client.set_results(fixtures::ranked_hospitals()).await;
        h.orchestrator.locate().await;
        h.orchestrator.detach();

        assert_eq!(
            h.orchestrator.submit_form(form("Delhi")).await,
            Ok(SubmitOutcome::Discarded)
        );
        assert_eq!(h.client.request_count().await, 0);
        assert_eq!(h.orchestrator.phase().await, Phase::Ready);
        assert!(!h.orchestrator.search_state().await.is_loading());
    }

    #[tokio::test]
    async fn test_failure_uses_detail_then_fallback() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;

        h.client
            .set_next_error(ServiceError::ServiceRejected {
                status: 422,
                detail: Some("Unknown city".to_string()),
            })
            .await;
        h.orchestrator.submit_form(form("Atlantis")).await.unwrap();
        assert_eq!(
            h.orchestrator.search_state().await.error_message(),
            Some("Unknown city")
        );
        assert_eq!(h.orchestrator.phase().await, Phase::Failed);

        h.client
            .set_next_error(ServiceError::NetworkFailure("refused".to_string()))
            .await;
        h.orchestrator.submit().await.unwrap();
        assert_eq!(
            h.orchestrator.search_state().await.error_message(),
            Some("Failed to fetch hospitals.")
        );
        assert_eq!(h.orchestrator.form().await.city, "Atlantis");
    }

    #[tokio::test]
    async fn test_mode_switch_keeps_location_and_results() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.client.set_results(fixtures::ranked_hospitals()).await;
        let fix = h.orchestrator.locate().await;
        h.orchestrator.submit_form(form("Delhi")).await.unwrap();

        h.orchestrator.select_mode(SearchMode::Prompt).await;
        assert_eq!(h.orchestrator.location().await, fix);
        assert_eq!(h.orchestrator.search_state().await.results().len(), 3);
        assert_eq!(h.orchestrator.mode().await, SearchMode::Prompt);
    }

    #[tokio::test]
    async fn test_apply_location_replaces_both() {
        let h = Harness::new(MockCoordinateSource::denied(DenialReason::Unavailable));
        h.orchestrator.locate().await;

        let fix = LocationFix::new(fixtures::pune(), PlaceLabel::new("Pune"));
        h.orchestrator.apply_location(fix.clone()).await;

        assert_eq!(h.orchestrator.location().await, Some(fix));
        assert_eq!(h.orchestrator.phase().await, Phase::Ready);
        assert_eq!(h.orchestrator.picker_demand().await, PickerDemand::Closed);
    }

    #[tokio::test]
    async fn test_request_change_and_dismiss() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        h.orchestrator.locate().await;

        h.orchestrator.request_location_change().await;
        assert_eq!(h.orchestrator.picker_demand().await, PickerDemand::Requested);

        h.orchestrator.dismiss_picker().await;
        assert_eq!(h.orchestrator.picker_demand().await, PickerDemand::Closed);
        assert_eq!(
            h.orchestrator.location().await.unwrap().coordinate,
            fixtures::delhi()
        );
    }

    #[tokio::test]
    async fn test_select_hospital() {
        let h = Harness::new(MockCoordinateSource::acquired(fixtures::delhi()));
        assert_eq!(
            h.orchestrator.select_hospital("AIIMS Trauma Centre").await,
            Err(SelectionError::NoResults)
        );

        h.client.set_results(fixtures::ranked_hospitals()).await;
        h.orchestrator.locate().await;
        h.orchestrator.submit_form(form("Delhi")).await.unwrap();

        let selection = h
            .orchestrator
            .select_hospital("Safdarjung Hospital")
            .await
            .unwrap();
        assert_eq!(selection.hospital_name(), "Safdarjung Hospital");
        assert_eq!(selection.coordinate(), fixtures::delhi());

        assert!(matches!(
            h.orchestrator.select_hospital("Nowhere General").await,
            Err(SelectionError::UnknownHospital(_))
        ));
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let h = Harness::new(MockCoordinateSource::acquired(
            Coordinate::new(12.9716, 77.5946).unwrap(),
        ));
        h.orchestrator.locate().await;

        let status = h.orchestrator.status().await;
        assert_eq!(status.phase, Phase::Ready);
        assert!(status.submit_enabled);
        assert!(status.attached);
        assert_eq!(status.result_count, 0);

        h.orchestrator.detach();
        assert!(!h.orchestrator.status().await.attached);
    }
}
