//! HTTP client for the recommendation service.
//!
//! One client serves ranking, feedback and account endpoints. The session
//! token is read on every request and sent as a bearer token when present.

mod wire;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use crate::auth::{
    AuthClient, Credentials, EmergencyResponse, LoginResponse, RegistrationForm, SessionStore,
};
use crate::config::ApiConfig;
use crate::error::ServiceError;
use crate::feedback::{FeedbackClient, FeedbackRecord};
use crate::metrics;
use crate::search::{HospitalRecommendation, RecommendationClient, SearchRequest};

use wire::{
    extract_detail, FeedbackAck, FeedbackPayload, LoginPayload, RecommendPayload,
    RecommendResponse, RegisterPayload,
};

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::NetworkFailure(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> Result<Response, ServiceError> {
        let started = std::time::Instant::now();
        let response = builder.send().await;
        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["api", operation])
            .observe(started.elapsed().as_secs_f64());

        let response = response.map_err(|e| ServiceError::NetworkFailure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            debug!(operation, status = status.as_u16(), ?detail, "Service rejected request");
            return Err(ServiceError::ServiceRejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RecommendationClient for ApiClient {
    async fn recommend(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<HospitalRecommendation>, ServiceError> {
        debug!(city = request.city(), "POST /recommend");
        let builder = self
            .request(Method::POST, "/recommend")
            .json(&RecommendPayload::from(request));
        let response = self.execute(builder, "recommend").await?;

        let body: RecommendResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("Failed to parse recommendations: {}", e))
        })?;

        body.recommendations
            .unwrap_or_default()
            .into_iter()
            .map(HospitalRecommendation::try_from)
            .collect()
    }
}

#[async_trait]
impl FeedbackClient for ApiClient {
    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), ServiceError> {
        debug!(hospital = %record.hospital_name, "POST /feedback");
        let builder = self
            .request(Method::POST, "/feedback")
            .json(&FeedbackPayload::from(record));
        let response = self.execute(builder, "feedback").await?;
        let status = response.status().as_u16();

        let body = response.text().await.unwrap_or_default();
        let ack: FeedbackAck = serde_json::from_str(&body).unwrap_or_default();
        if ack.status.as_deref() == Some("error") {
            return Err(ServiceError::ServiceRejected {
                status,
                detail: ack.message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuthClient for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ServiceError> {
        debug!(email = %credentials.email, "POST /login");
        let builder = self.request(Method::POST, "/login").json(&LoginPayload {
            email: &credentials.email,
            password: &credentials.password,
        });
        let response = self.execute(builder, "login").await?;
        response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })
    }

    async fn register(&self, form: &RegistrationForm) -> Result<(), ServiceError> {
        debug!(email = %form.email, role = form.role.as_str(), "POST /register");
        let builder = self
            .request(Method::POST, "/register")
            .json(&RegisterPayload::from(form));
        self.execute(builder, "register").await?;
        Ok(())
    }

    async fn emergency(&self) -> Result<EmergencyResponse, ServiceError> {
        debug!("GET /emergency");
        let response = self
            .execute(self.request(Method::GET, "/emergency"), "emergency")
            .await?;
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}
