//! Mock account service for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{AuthClient, Credentials, EmergencyResponse, LoginResponse, RegistrationForm};
use crate::error::ServiceError;

/// Mock implementation of the AuthClient trait.
///
/// Login answers with no token unless one is configured.
pub struct MockAuthClient {
    login_response: Arc<RwLock<LoginResponse>>,
    emergency_response: Arc<RwLock<EmergencyResponse>>,
    logins: Arc<RwLock<Vec<String>>>,
    registrations: Arc<RwLock<Vec<RegistrationForm>>>,
    emergencies: Arc<RwLock<usize>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
}

impl Default for MockAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self {
            login_response: Arc::new(RwLock::new(LoginResponse::default())),
            emergency_response: Arc::new(RwLock::new(EmergencyResponse::default())),
            logins: Arc::new(RwLock::new(Vec::new())),
            registrations: Arc::new(RwLock::new(Vec::new())),
            emergencies: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_login_response(&self, response: LoginResponse) {
        *self.login_response.write().await = response;
    }

    pub async fn set_emergency_response(&self, response: EmergencyResponse) {
        *self.emergency_response.write().await = response;
    }

    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Emails of every login attempt.
    pub async fn login_attempts(&self) -> Vec<String> {
        self.logins.read().await.clone()
    }

    pub async fn registrations(&self) -> Vec<RegistrationForm> {
        self.registrations.read().await.clone()
    }

    pub async fn emergency_count(&self) -> usize {
        *self.emergencies.read().await
    }

    async fn take_error(&self) -> Result<(), ServiceError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ServiceError> {
        self.logins.write().await.push(credentials.email.clone());
        self.take_error().await?;
        Ok(self.login_response.read().await.clone())
    }

    async fn register(&self, form: &RegistrationForm) -> Result<(), ServiceError> {
        self.take_error().await?;
        self.registrations.write().await.push(form.clone());
        Ok(())
    }

    async fn emergency(&self) -> Result<EmergencyResponse, ServiceError> {
        *self.emergencies.write().await += 1;
        self.take_error().await?;
        Ok(self.emergency_response.read().await.clone())
    }
}
