//! Query text sent to the ranking service.

use super::types::{BloodType, FormInput, SearchValidationError};

/// Compose the structured query for a form-mode search.
///
/// The ranking service's text understanding relies on this exact layout:
/// `Emergency: <category> - Patient blood type: <code>[ - Additional info: <details>]`.
pub fn compose_form_query(category: &str, blood_type: BloodType, details: Option<&str>) -> String {
    let mut query = format!(
        "Emergency: {} - Patient blood type: {}",
        category.trim(),
        blood_type.code()
    );
    if let Some(details) = details.map(str::trim).filter(|d| !d.is_empty()) {
        query.push_str(" - Additional info: ");
        query.push_str(details);
    }
    query
}

/// Validate a form and compose its query.
pub fn form_query(form: &FormInput) -> Result<String, SearchValidationError> {
    if form.city.trim().is_empty() {
        return Err(SearchValidationError::MissingCity);
    }
    if form.category.trim().is_empty() {
        return Err(SearchValidationError::MissingCategory);
    }
    Ok(compose_form_query(
        &form.category,
        form.blood_type,
        Some(&form.details),
    ))
}

/// Validate a prompt. The text itself is sent verbatim.
pub fn prompt_query(description: &str) -> Result<String, SearchValidationError> {
    if description.trim().is_empty() {
        return Err(SearchValidationError::BlankPrompt);
    }
    Ok(description.to_string())
}
