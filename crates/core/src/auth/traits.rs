use async_trait::async_trait;
use thiserror::Error;

use crate::error::ServiceError;

use super::session::SessionError;
use super::types::{Credentials, EmergencyResponse, LoginResponse, RegistrationForm};

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const EMERGENCY_FAILED_MESSAGE: &str = "Could not reach emergency service.";
pub const EMERGENCY_ENABLED_MESSAGE: &str = "Emergency access enabled";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", LOGIN_FAILED_MESSAGE)]
    InvalidCredentials,

    /// Registration refused; carries the service detail or the generic text.
    #[error("{0}")]
    RegistrationFailed(String),

    #[error("{}", EMERGENCY_FAILED_MESSAGE)]
    EmergencyUnavailable,

    #[error("emergency access is disabled in this deployment")]
    EmergencyBypassDisabled,

    #[error("{0}")]
    InvalidForm(String),

    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

/// Trait for the remote account service.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ServiceError>;

    async fn register(&self, form: &RegistrationForm) -> Result<(), ServiceError>;

    async fn emergency(&self) -> Result<EmergencyResponse, ServiceError>;
}
