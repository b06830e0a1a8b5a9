use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Email and password for a login attempt.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Answer of the emergency endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmergencyResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Clinical details collected for thalassemia patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalProfile {
    pub full_name: String,
    pub age: u32,
    pub blood_group: String,
    pub last_transfusion: NaiveDate,
    pub interval_days: u32,
    pub city: String,
}

/// Account role chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Normal,
    Thalassemia(ClinicalProfile),
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Thalassemia(_) => "thalassemia",
        }
    }
}

/// New account details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
}

impl RegistrationForm {
    /// Check required fields before anything is sent.
    pub fn validate(&self) -> Result<(), AuthError> {
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(AuthError::InvalidForm("email address is not valid".to_string()));
        }
        require("password", &self.password)?;
        require("phone", &self.phone)?;

        if let Role::Thalassemia(profile) = &self.role {
            require("full_name", &profile.full_name)?;
            require("blood_group", &profile.blood_group)?;
            require("city", &profile.city)?;
            if profile.age == 0 {
                return Err(AuthError::InvalidForm("age must be positive".to_string()));
            }
            if profile.interval_days == 0 {
                return Err(AuthError::InvalidForm(
                    "interval_days must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidForm(format!("{} is required", field)));
    }
    Ok(())
}
