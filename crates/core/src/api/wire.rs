//! JSON shapes exchanged with the recommendation service.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::auth::{ClinicalProfile, RegistrationForm};
use crate::error::ServiceError;
use crate::feedback::FeedbackRecord;
use crate::search::{BloodType, HospitalRecommendation, SearchRequest};

#[derive(Debug, Serialize)]
pub(super) struct RecommendPayload<'a> {
    city: &'a str,
    blood_type: BloodType,
    query: &'a str,
    user_lat: f64,
    user_lon: f64,
}

impl<'a> From<&'a SearchRequest> for RecommendPayload<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        Self {
            city: request.city(),
            blood_type: request.blood_type(),
            query: request.query(),
            user_lat: request.coordinate().latitude(),
            user_lon: request.coordinate().longitude(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecommendResponse {
    #[serde(default)]
    pub recommendations: Option<Vec<WireRecommendation>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireRecommendation {
    name: String,
    rating: f64,
    response: f64,
    #[serde(deserialize_with = "whole_count")]
    icu: u32,
    #[serde(deserialize_with = "whole_count")]
    blood: u32,
    distance: f64,
    #[serde(default)]
    explanation: Option<String>,
}

/// Counts come straight from database columns and may be written as `3.0`.
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return Err(de::Error::custom(format!(
            "expected a non-negative whole count, got {}",
            value
        )));
    }
    Ok(value as u32)
}

impl TryFrom<WireRecommendation> for HospitalRecommendation {
    type Error = ServiceError;

    fn try_from(wire: WireRecommendation) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&wire.rating) {
            return Err(ServiceError::InvalidResponse(format!(
                "rating {} out of range for '{}'",
                wire.rating, wire.name
            )));
        }
        if [wire.response, wire.distance]
            .iter()
            .any(|v| v.is_nan() || *v < 0.0)
        {
            return Err(ServiceError::InvalidResponse(format!(
                "negative response time or distance for '{}'",
                wire.name
            )));
        }
        Ok(HospitalRecommendation {
            name: wire.name,
            rating: wire.rating,
            response_time_minutes: wire.response,
            icu_beds: wire.icu,
            blood_units: wire.blood,
            distance_km: wire.distance,
            explanation: wire.explanation.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct FeedbackPayload<'a> {
    hospital: &'a str,
    rating: bool,
    comment: &'a str,
    user_lat: f64,
    user_lon: f64,
}

impl<'a> From<&'a FeedbackRecord> for FeedbackPayload<'a> {
    fn from(record: &'a FeedbackRecord) -> Self {
        Self {
            hospital: &record.hospital_name,
            rating: record.helpful,
            comment: &record.comment,
            user_lat: record.coordinate.latitude(),
            user_lon: record.coordinate.longitude(),
        }
    }
}

/// Feedback acknowledgment. The service may answer 200 with
/// `status = "error"` when it could not store the rating.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FeedbackAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub(super) struct LoginPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterPayload<'a> {
    email: &'a str,
    password: &'a str,
    phone: &'a str,
    role: &'static str,
    #[serde(flatten)]
    profile: Option<&'a ClinicalProfile>,
}

impl<'a> From<&'a RegistrationForm> for RegisterPayload<'a> {
    fn from(form: &'a RegistrationForm) -> Self {
        let profile = match &form.role {
            crate::auth::Role::Normal => None,
            crate::auth::Role::Thalassemia(profile) => Some(profile),
        };
        Self {
            email: &form.email,
            password: &form.password,
            phone: &form.phone,
            role: form.role.as_str(),
            profile,
        }
    }
}

/// Pull a usable message out of an error body.
///
/// Only a non-blank string `detail` counts; validation arrays, HTML pages
/// and empty bodies yield nothing.
pub(super) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
