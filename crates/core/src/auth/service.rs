//! Login, registration and emergency access over an `AuthClient`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::FailureKind;
use crate::metrics;

use super::session::SessionStore;
use super::traits::{
    AuthClient, AuthError, EMERGENCY_ENABLED_MESSAGE, REGISTRATION_FAILED_MESSAGE,
};
use super::types::{Credentials, RegistrationForm};

#[derive(Clone)]
pub struct AuthService {
    client: Arc<dyn AuthClient>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(client: Arc<dyn AuthClient>, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Log in and store the returned access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let credentials = Credentials::new(email.trim(), password);
        let token = match self.client.login(&credentials).await {
            Ok(response) => response.access_token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(email = %credentials.email, "Login failed: {}", e);
                None
            }
        };

        let Some(token) = token else {
            record("login", false);
            return Err(AuthError::InvalidCredentials);
        };

        self.session.set_token(token)?;
        record("login", true);
        info!(email = %credentials.email, "Logged in");
        Ok(())
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<(), AuthError> {
        form.validate()?;
        match self.client.register(form).await {
            Ok(()) => {
                record("register", true);
                info!(email = %form.email, role = form.role.as_str(), "Registered");
                Ok(())
            }
            Err(e) => {
                warn!(email = %form.email, "Registration failed: {}", e);
                record("register", false);
                Err(AuthError::RegistrationFailed(
                    e.user_message(REGISTRATION_FAILED_MESSAGE),
                ))
            }
        }
    }

    /// Enable emergency access. Returns the message to show the user.
    pub async fn emergency_access(&self) -> Result<String, AuthError> {
        if !self.session.emergency_bypass() {
            return Err(AuthError::EmergencyBypassDisabled);
        }

        let response = self.client.emergency().await.map_err(|e| {
            warn!("Emergency endpoint failed: {}", e);
            record("emergency", false);
            AuthError::EmergencyUnavailable
        })?;

        self.session.grant_emergency()?;
        record("emergency", true);
        info!("Emergency access granted");
        Ok(response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| EMERGENCY_ENABLED_MESSAGE.to_string()))
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }
}

fn record(action: &str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::AUTH_ATTEMPTS
        .with_label_values(&[action, result])
        .inc();
    if !ok {
        metrics::record_failure(FailureKind::AuthFailure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{EmergencyResponse, LoginResponse, Role};
    use crate::error::ServiceError;
    use crate::testing::MockAuthClient;

    fn service(client: Arc<MockAuthClient>, bypass: bool) -> AuthService {
        AuthService::new(client, Arc::new(SessionStore::in_memory(bypass)))
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            email: "ravi@example.com".to_string(),
            password: "pw".to_string(),
            phone: "9000000000".to_string(),
            role: Role::Normal,
        }
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_login_response(LoginResponse {
                access_token: Some("tok-1".to_string()),
            })
            .await;
        let auth = service(client.clone(), true);

        auth.login(" ravi@example.com ", "pw").await.unwrap();
        assert_eq!(auth.session().token().as_deref(), Some("tok-1"));
        assert_eq!(
            client.login_attempts().await,
            vec!["ravi@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_login_without_token_is_invalid() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client, true);

        let err = auth.login("ravi@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejection_ignores_detail() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_next_error(ServiceError::ServiceRejected {
                status: 401,
                detail: Some("bad password".to_string()),
            })
            .await;
        let auth = service(client, true);

        let err = auth.login("ravi@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_register_uses_service_detail() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_next_error(ServiceError::ServiceRejected {
                status: 400,
                detail: Some("Email already registered".to_string()),
            })
            .await;
        let auth = service(client, true);

        let err = auth.register(&form()).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_register_falls_back_to_generic_message() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_next_error(ServiceError::NetworkFailure("refused".to_string()))
            .await;
        let auth = service(client, true);

        let err = auth.register(&form()).await.unwrap_err();
        assert_eq!(err.to_string(), "Registration failed. Please try again.");
    }

    #[tokio::test]
    async fn test_register_invalid_form_not_sent() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client.clone(), true);
        let mut f = form();
        f.email = "not-an-email".to_string();

        assert!(matches!(
            auth.register(&f).await,
            Err(AuthError::InvalidForm(_))
        ));
        assert!(client.registrations().await.is_empty());
    }

    #[tokio::test]
    async fn test_emergency_grants_flag() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client, true);

        let message = auth.emergency_access().await.unwrap();
        assert_eq!(message, "Emergency access enabled");
        assert!(auth.session().is_emergency());
        assert!(auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_emergency_uses_service_message() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_emergency_response(EmergencyResponse {
                message: Some("Nearest ER notified".to_string()),
            })
            .await;
        let auth = service(client, true);
        assert_eq!(auth.emergency_access().await.unwrap(), "Nearest ER notified");
    }

    #[tokio::test]
    async fn test_emergency_disabled_skips_service() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client.clone(), false);

        assert!(matches!(
            auth.emergency_access().await,
            Err(AuthError::EmergencyBypassDisabled)
        ));
        assert_eq!(client.emergency_count().await, 0);
    }

    #[tokio::test]
    async fn test_emergency_failure_message() {
        let client = Arc::new(MockAuthClient::new());
        client
            .set_next_error(ServiceError::NetworkFailure("down".to_string()))
            .await;
        let auth = service(client, true);

        let err = auth.emergency_access().await.unwrap_err();
        assert_eq!(err.to_string(), "Could not reach emergency service.");
        assert!(!auth.session().is_emergency());
    }

    #[test]
    fn test_register_thalassemia_sends_profile() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client.clone(), true);
        let mut f = form();
        f.role = Role::Thalassemia(crate::auth::ClinicalProfile {
            full_name: "Ravi Kumar".to_string(),
            age: 14,
            blood_group: "B+".to_string(),
            last_transfusion: chrono::NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            interval_days: 21,
            city: "Hyderabad".to_string(),
        });

        tokio_test::assert_ok!(tokio_test::block_on(auth.register(&f)));
        let sent = tokio_test::block_on(client.registrations());
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].role.as_str(), "thalassemia");
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let client = Arc::new(MockAuthClient::new());
        let auth = service(client, true);
        auth.session().set_token("t").unwrap();
        auth.session().grant_emergency().unwrap();

        auth.logout().unwrap();
        assert!(!auth.session().is_authenticated());
        assert!(!auth.session().is_emergency());
    }
}
