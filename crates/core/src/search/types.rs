//! Types for hospital search.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::Coordinate;

/// Shown when a search succeeds with no recommendations.
pub const NO_HOSPITALS_MESSAGE: &str = "No hospitals found. Try another search.";

/// Shown when a search fails without a usable detail from the service.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch hospitals.";

/// Shown when a search is attempted before a location is known.
pub const LOCATION_UNAVAILABLE_MESSAGE: &str = "Location not available.";

/// Example emergency descriptions offered on the prompt surface.
pub const PROMPT_SUGGESTIONS: [&str; 4] = [
    "Urgent accident needs O+ blood",
    "Critical condition requires ICU and blood",
    "Emergency surgery patient needs nearby hospital",
    "Trauma case with heavy bleeding",
];

/// ABO/Rh blood type, identified on the wire by its stock column code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BloodType {
    #[default]
    #[serde(rename = "blood_o_pos")]
    OPositive,
    #[serde(rename = "blood_o_neg")]
    ONegative,
    #[serde(rename = "blood_a_pos")]
    APositive,
    #[serde(rename = "blood_a_neg")]
    ANegative,
    #[serde(rename = "blood_b_pos")]
    BPositive,
    #[serde(rename = "blood_b_neg")]
    BNegative,
    #[serde(rename = "blood_ab_pos")]
    AbPositive,
    #[serde(rename = "blood_ab_neg")]
    AbNegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::OPositive,
        BloodType::ONegative,
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
    ];

    /// Wire code, e.g. `blood_o_pos`.
    pub fn code(&self) -> &'static str {
        match self {
            BloodType::OPositive => "blood_o_pos",
            BloodType::ONegative => "blood_o_neg",
            BloodType::APositive => "blood_a_pos",
            BloodType::ANegative => "blood_a_neg",
            BloodType::BPositive => "blood_b_pos",
            BloodType::BNegative => "blood_b_neg",
            BloodType::AbPositive => "blood_ab_pos",
            BloodType::AbNegative => "blood_ab_neg",
        }
    }

    /// Display label, e.g. `O+`.
    pub fn label(&self) -> &'static str {
        match self {
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
        }
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown blood type: {0}")]
pub struct UnknownBloodType(pub String);

impl FromStr for BloodType {
    type Err = UnknownBloodType;

    /// Accepts either the wire code (`blood_ab_neg`) or the label (`AB-`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        BloodType::ALL
            .into_iter()
            .find(|bt| {
                bt.code().eq_ignore_ascii_case(needle) || bt.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownBloodType(s.to_string()))
    }
}

/// The two mutually exclusive search surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Free-text emergency description.
    #[default]
    Prompt,
    /// Structured city / blood type / category form.
    Form,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Prompt => "prompt",
            SearchMode::Form => "form",
        }
    }
}

/// Contents of the structured search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub city: String,
    pub blood_type: BloodType,
    /// Emergency category, e.g. "accident".
    pub category: String,
    /// Optional free-text details.
    #[serde(default)]
    pub details: String,
}

/// Rejected search input. Never changes orchestrator state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchValidationError {
    #[error("Please enter a city")]
    MissingCity,

    #[error("Please describe the emergency")]
    BlankPrompt,

    #[error("Please choose an emergency category")]
    MissingCategory,
}

/// A single recommendation request. Built fresh per submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    city: String,
    blood_type: BloodType,
    query: String,
    coordinate: Coordinate,
}

impl SearchRequest {
    pub fn new(
        city: &str,
        blood_type: BloodType,
        query: impl Into<String>,
        coordinate: Coordinate,
    ) -> Result<Self, SearchValidationError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SearchValidationError::MissingCity);
        }
        Ok(Self {
            city: city.to_string(),
            blood_type,
            query: query.into(),
            coordinate,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// A ranked hospital suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecommendation {
    pub name: String,
    /// Quality rating, 0 to 5.
    pub rating: f64,
    pub response_time_minutes: f64,
    pub icu_beds: u32,
    pub blood_units: u32,
    pub distance_km: f64,
    #[serde(default)]
    pub explanation: String,
}

/// Lifecycle of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// User-visible status line derived from a `SearchState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    /// Informational: the search worked but nothing matched.
    NoHospitals,
    /// The search failed.
    Error(String),
}

impl SearchMessage {
    pub fn text(&self) -> &str {
        match self {
            SearchMessage::NoHospitals => NO_HOSPITALS_MESSAGE,
            SearchMessage::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SearchMessage::Error(_))
    }
}

/// Search status owned by the orchestrator.
///
/// `results` is non-empty only in `Success`; `error_message` is set only in
/// `Error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    phase: SearchPhase,
    results: Vec<HospitalRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl SearchState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            phase: SearchPhase::Loading,
            ..Self::default()
        }
    }

    /// Ordering of `results` is preserved as received.
    pub fn succeeded(results: Vec<HospitalRecommendation>) -> Self {
        Self {
            phase: SearchPhase::Success,
            results,
            error_message: None,
            completed_at: Some(Utc::now()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            phase: SearchPhase::Error,
            results: Vec::new(),
            error_message: Some(message.into()),
            completed_at: Some(Utc::now()),
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn results(&self) -> &[HospitalRecommendation] {
        &self.results
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    pub fn message(&self) -> Option<SearchMessage> {
        match self.phase {
            SearchPhase::Success if self.results.is_empty() => Some(SearchMessage::NoHospitals),
            SearchPhase::Error => Some(SearchMessage::Error(
                self.error_message
                    .clone()
                    .unwrap_or_else(|| SEARCH_FAILED_MESSAGE.to_string()),
            )),
            _ => None,
        }
    }

    /// Find a presented recommendation by exact name.
    pub fn find(&self, hospital_name: &str) -> Option<&HospitalRecommendation> {
        self.results.iter().find(|h| h.name == hospital_name)
    }
}
