//! Orchestrator lifecycle integration tests.
//!
//! These tests drive the full flow through the mocks:
//! locate (or pick) -> submit -> results -> select -> feedback

use std::sync::Arc;
use std::time::Duration;

use hemaroute_core::{
    feedback::{FeedbackCollector, ModalStatus},
    location::{DenialReason, Geocoder, GeocodeError, LocationFix},
    orchestrator::PickerDemand,
    picker::{LocationPicker, MapSurface},
    search::{SearchPhase, NO_HOSPITALS_MESSAGE, SEARCH_FAILED_MESSAGE},
    testing::{
        fixtures, MockCoordinateSource, MockFeedbackClient, MockGeocoder, MockMapSurface,
        MockRecommendationClient,
    },
    BloodType, Coordinate, FormInput, OrchestratorConfig, Phase, PlaceResolver,
    SearchOrchestrator, ServiceError, SubmitOutcome,
};
use hemaroute_core::config::PickerConfig;

/// Test helper to create all collaborators for orchestrator testing.
struct TestHarness {
    source: Arc<MockCoordinateSource>,
    geocoder: Arc<MockGeocoder>,
    surface: Arc<MockMapSurface>,
    client: Arc<MockRecommendationClient>,
    feedback: Arc<MockFeedbackClient>,
    orchestrator: SearchOrchestrator,
}

impl TestHarness {
    fn new(source: MockCoordinateSource) -> Self {
        let source = Arc::new(source);
        let geocoder = Arc::new(MockGeocoder::new());
        let client = Arc::new(MockRecommendationClient::new());
        let orchestrator = SearchOrchestrator::new(
            OrchestratorConfig::default(),
            Arc::clone(&source) as Arc<dyn hemaroute_core::CoordinateSource>,
            PlaceResolver::new(Arc::clone(&geocoder) as Arc<dyn Geocoder>),
            Arc::clone(&client) as Arc<dyn hemaroute_core::search::RecommendationClient>,
        );

        Self {
            source,
            geocoder,
            surface: Arc::new(MockMapSurface::new()),
            client,
            feedback: Arc::new(MockFeedbackClient::new()),
            orchestrator,
        }
    }

    fn open_picker(&self) -> LocationPicker {
        LocationPicker::open(
            Arc::clone(&self.surface) as Arc<dyn MapSurface>,
            Arc::clone(&self.geocoder) as Arc<dyn Geocoder>,
            &PickerConfig::default(),
        )
        .expect("Failed to open picker")
    }

    fn collector(&self) -> FeedbackCollector {
        FeedbackCollector::new(Arc::clone(&self.feedback) as _, Duration::from_millis(2000))
    }
}

fn accident_form(city: &str) -> FormInput {
    FormInput {
        city: city.to_string(),
        blood_type: BloodType::OPositive,
        category: "accident".to_string(),
        details: String::new(),
    }
}

#[tokio::test]
async fn test_denied_location_reaches_picker() {
    for reason in [
        DenialReason::Unsupported,
        DenialReason::PermissionDenied,
        DenialReason::Unavailable,
    ] {
        let h = TestHarness::new(MockCoordinateSource::denied(reason));
        assert!(h.orchestrator.locate().await.is_none());
        assert_eq!(
            h.orchestrator.picker_demand().await,
            PickerDemand::Required(reason)
        );
        assert_eq!(h.orchestrator.phase().await, Phase::AwaitingLocation);
    }
}

#[tokio::test]
async fn test_picker_confirmation_applies_exact_fix() {
    let h = TestHarness::new(MockCoordinateSource::denied(DenialReason::PermissionDenied));
    h.geocoder.add_place("Pune", vec![fixtures::pune()]).await;
    h.orchestrator.locate().await;

    let mut picker = h.open_picker();
    picker.search_place("Pune").await.unwrap();
    let fix = picker.confirm().unwrap();
    h.orchestrator.apply_location(fix.clone()).await;

    let applied = h.orchestrator.location().await.unwrap();
    assert_eq!(applied, fix);
    assert_eq!(applied.coordinate, fixtures::pune());
    assert_eq!(applied.place.as_str(), "Pune");
    assert_eq!(h.orchestrator.phase().await, Phase::Ready);
    assert_eq!(h.surface.live_maps(), 0);
}

#[tokio::test]
async fn test_change_location_replaces_wholesale() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.geocoder.set_address(fixtures::city_address("New Delhi")).await;
    h.orchestrator.locate().await;

    h.orchestrator.request_location_change().await;
    let mut picker = h.open_picker();
    let chosen = Coordinate::new(19.076, 72.8777).unwrap();
    picker.select(chosen).unwrap();
    let fix = picker.confirm().unwrap();
    h.orchestrator.apply_location(fix).await;

    let location = h.orchestrator.location().await.unwrap();
    assert_eq!(location.coordinate, chosen);
    assert!(location.place.is_sentinel());
    assert_eq!(h.orchestrator.picker_demand().await, PickerDemand::Closed);
}

#[tokio::test]
async fn test_reverse_geocode_town_and_failure() {
    let h = TestHarness::new(MockCoordinateSource::acquired(
        Coordinate::new(28.6139, 77.2090).unwrap(),
    ));
    h.geocoder.set_address(fixtures::town_address("Test Town")).await;
    let fix = h.orchestrator.locate().await.unwrap();
    assert_eq!(fix.place.as_str(), "Test Town");

    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.geocoder
        .set_next_error(GeocodeError::ParseError("connection reset".to_string()))
        .await;
    let fix = h.orchestrator.locate().await.unwrap();
    assert_eq!(fix.place.as_str(), "Current Location");

    // The flow stays usable.
    h.client.set_results(fixtures::ranked_hospitals()).await;
    let outcome = h.orchestrator.submit_form(accident_form("Delhi")).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(_)));
    assert_eq!(h.orchestrator.phase().await, Phase::Succeeded);
}

#[tokio::test]
async fn test_submit_while_searching_is_noop() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.client.set_results(fixtures::ranked_hospitals()).await;
    h.orchestrator.locate().await;

    h.client.hold();
    let orchestrator = h.orchestrator.clone();
    let in_flight =
        tokio::spawn(async move { orchestrator.submit_form(accident_form("Delhi")).await });
    h.client.wait_for_call().await;

    assert_eq!(h.orchestrator.phase().await, Phase::Searching);
    assert!(!h.orchestrator.submit_enabled().await);
    assert!(h.orchestrator.search_state().await.is_loading());

    for _ in 0..3 {
        assert_eq!(
            h.orchestrator.submit().await,
            Ok(SubmitOutcome::AlreadySearching)
        );
    }
    assert_eq!(
        h.orchestrator.submit_prompt("another").await,
        Ok(SubmitOutcome::AlreadySearching)
    );
    assert_eq!(h.client.request_count().await, 1);

    h.client.release();
    let outcome = in_flight.await.unwrap().unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(ref s) if s.results().len() == 3));
    assert!(h.orchestrator.submit_enabled().await);
}

#[tokio::test]
async fn test_empty_results_never_show_failure_message() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.orchestrator.locate().await;

    h.orchestrator.submit_form(accident_form("Leh")).await.unwrap();
    let state = h.orchestrator.search_state().await;
    assert_eq!(state.phase(), SearchPhase::Success);
    let message = state.message().unwrap();
    assert_eq!(message.text(), NO_HOSPITALS_MESSAGE);
    assert_ne!(message.text(), SEARCH_FAILED_MESSAGE);
    assert_eq!(h.orchestrator.phase().await, Phase::Succeeded);
}

#[tokio::test]
async fn test_exact_form_query() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.orchestrator.locate().await;

    h.orchestrator.submit_form(accident_form("Delhi")).await.unwrap();
    let requests = h.client.recorded_requests().await;
    assert_eq!(
        requests[0].query(),
        "Emergency: accident - Patient blood type: blood_o_pos"
    );
}

#[tokio::test]
async fn test_failed_search_recovers_on_next_submit() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.orchestrator.locate().await;

    h.client
        .set_next_error(ServiceError::NetworkFailure("timeout".to_string()))
        .await;
    h.orchestrator.submit_form(accident_form("Delhi")).await.unwrap();
    assert_eq!(h.orchestrator.phase().await, Phase::Failed);
    assert_eq!(
        h.orchestrator.search_state().await.error_message(),
        Some(SEARCH_FAILED_MESSAGE)
    );

    h.client.set_results(fixtures::ranked_hospitals()).await;
    h.orchestrator.submit().await.unwrap();
    assert_eq!(h.orchestrator.phase().await, Phase::Succeeded);
    assert_eq!(h.client.recorded_requests().await[1].city(), "Delhi");
}

#[tokio::test(start_paused = true)]
async fn test_feedback_failure_leaves_search_state() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.client.set_results(fixtures::ranked_hospitals()).await;
    h.orchestrator.locate().await;
    h.orchestrator.submit_form(accident_form("Delhi")).await.unwrap();
    let before = h.orchestrator.search_state().await;

    h.feedback
        .set_next_error(ServiceError::ServiceRejected {
            status: 500,
            detail: None,
        })
        .await;
    let selection = h
        .orchestrator
        .select_hospital("Safdarjung Hospital")
        .await
        .unwrap();
    let mut modal = h.collector().open(selection);
    modal.set_helpful(true);
    modal.set_comment("Fast triage");

    let receipt = modal.submit().await.unwrap();
    assert!(!receipt.delivered);
    assert_eq!(modal.status(), ModalStatus::Confirmed);
    modal.close_after_confirmation().await;
    assert_eq!(modal.status(), ModalStatus::Closed);

    assert_eq!(h.orchestrator.search_state().await, before);
    assert_eq!(h.orchestrator.phase().await, Phase::Succeeded);

    let sent = h.feedback.submissions().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].hospital_name, "Safdarjung Hospital");
    assert_eq!(sent[0].coordinate, fixtures::delhi());
}

#[tokio::test]
async fn test_detached_orchestrator_discards_late_response() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.client.set_results(fixtures::ranked_hospitals()).await;
    h.orchestrator.locate().await;

    h.client.hold();
    let orchestrator = h.orchestrator.clone();
    let in_flight =
        tokio::spawn(async move { orchestrator.submit_form(accident_form("Delhi")).await });
    h.client.wait_for_call().await;

    h.orchestrator.detach();
    h.client.release();

    assert_eq!(in_flight.await.unwrap(), Ok(SubmitOutcome::Discarded));
    assert!(h.orchestrator.search_state().await.results().is_empty());
}

#[tokio::test]
async fn test_mode_switch_keeps_location() {
    let h = TestHarness::new(MockCoordinateSource::acquired(fixtures::delhi()));
    h.geocoder.set_address(fixtures::city_address("New Delhi")).await;
    let fix: Option<LocationFix> = h.orchestrator.locate().await;

    for mode in [
        hemaroute_core::SearchMode::Form,
        hemaroute_core::SearchMode::Prompt,
        hemaroute_core::SearchMode::Form,
    ] {
        h.orchestrator.select_mode(mode).await;
        assert_eq!(h.orchestrator.location().await, fix);
        assert_eq!(h.orchestrator.mode().await, mode);
    }
    assert_eq!(h.source.acquire_count().await, 1);
}
