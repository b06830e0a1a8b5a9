//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Location pipeline (acquisition outcomes, geocoding)
//! - Search orchestrator (submissions, latency, result counts)
//! - Feedback and auth surfaces

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

use crate::error::FailureKind;

// =============================================================================
// Location Metrics
// =============================================================================

/// Location acquisition outcomes.
pub static LOCATION_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "hemaroute_location_outcomes_total",
            "Location acquisition outcomes",
        ),
        &["outcome"], // "acquired", "unsupported", "permission_denied", "timeout", "unavailable", "picked"
    )
    .unwrap()
});

/// Geocoding requests by direction and result.
pub static GEOCODE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hemaroute_geocode_requests_total", "Total geocoding requests"),
        &["direction", "result"], // direction: "forward", "reverse"; result: "ok", "error"
    )
    .unwrap()
});

/// Place resolutions that fell back to the sentinel label.
pub static PLACE_FALLBACKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "hemaroute_place_fallbacks_total",
        "Place resolutions that fell back to the sentinel label",
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Search submissions by mode and outcome.
pub static SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hemaroute_searches_total", "Total search submissions"),
        &["mode", "outcome"], // outcome: "success", "empty", "failed", "rejected", "discarded"
    )
    .unwrap()
});

/// Recommendation round-trip duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hemaroute_search_duration_seconds",
            "Duration of recommendation requests",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["mode"],
    )
    .unwrap()
});

/// Recommendations returned per successful search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hemaroute_search_results",
            "Number of recommendations returned per search",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Feedback & Auth Metrics
// =============================================================================

/// Feedback submissions by outcome.
pub static FEEDBACK_SUBMISSIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "hemaroute_feedback_submissions_total",
            "Total feedback submissions",
        ),
        &["outcome"], // "delivered", "lost"
    )
    .unwrap()
});

/// Auth attempts by action and result.
pub static AUTH_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hemaroute_auth_attempts_total", "Total auth attempts"),
        &["action", "result"], // action: "login", "register", "emergency"
    )
    .unwrap()
});

// =============================================================================
// Cross-cutting
// =============================================================================

/// Failures by kind.
pub static FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hemaroute_failures_total", "Failures by kind"),
        &["kind"],
    )
    .unwrap()
});

/// External service request duration in seconds.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hemaroute_external_service_duration_seconds",
            "Duration of external service requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"], // service: "api", "nominatim"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Count a failure of the given kind.
pub fn record_failure(kind: FailureKind) {
    FAILURES.with_label_values(&[kind.as_str()]).inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Location
        Box::new(LOCATION_OUTCOMES.clone()),
        Box::new(GEOCODE_REQUESTS.clone()),
        Box::new(PLACE_FALLBACKS.clone()),
        // Search
        Box::new(SEARCHES.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Feedback & auth
        Box::new(FEEDBACK_SUBMISSIONS.clone()),
        Box::new(AUTH_ATTEMPTS.clone()),
        // Cross-cutting
        Box::new(FAILURES.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
    ]
}
