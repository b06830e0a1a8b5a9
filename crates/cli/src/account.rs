//! Account commands: login, logout, registration and emergency access.

use anyhow::{Context, Result};
use tracing::info;

use hemaroute_core::{ClinicalProfile, RegistrationForm, Role};

use crate::state::AppState;
use crate::RegisterArgs;

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<()> {
    state.auth_service().login(email, password).await?;
    println!("Logged in as {}", email.trim());
    Ok(())
}

pub fn logout(state: &AppState) -> Result<()> {
    state
        .auth_service()
        .logout()
        .context("Failed to clear session")?;
    println!("Logged out");
    Ok(())
}

pub async fn register(state: &AppState, args: RegisterArgs) -> Result<()> {
    let form = registration_form(args);
    info!(role = form.role.as_str(), "Registering account");
    state.auth_service().register(&form).await?;
    println!("Registered {}. You can now log in.", form.email);
    Ok(())
}

pub async fn emergency(state: &AppState) -> Result<()> {
    let message = state.auth_service().emergency_access().await?;
    println!("{}", message);
    Ok(())
}

/// Build the form; a thalassemia profile is attached only when every
/// clinical field is present.
pub(crate) fn registration_form(args: RegisterArgs) -> RegistrationForm {
    let role = match (
        args.thalassemia,
        args.full_name,
        args.age,
        args.blood_group,
        args.last_transfusion,
        args.interval_days,
        args.city,
    ) {
        (
            true,
            Some(full_name),
            Some(age),
            Some(blood_group),
            Some(last_transfusion),
            Some(interval_days),
            Some(city),
        ) => Role::Thalassemia(ClinicalProfile {
            full_name,
            age,
            blood_group,
            last_transfusion,
            interval_days,
            city,
        }),
        _ => Role::Normal,
    };

    RegistrationForm {
        email: args.email,
        password: args.password,
        phone: args.phone,
        role,
    }
}
