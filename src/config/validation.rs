//! Validation of profile fields.
use super::UserProfile;
use crate::error::ConfigError;

/// Trim every field, drop a blank URL, and check the required fields.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for an empty name or email, an email
/// without `@`, or a URL without an `http(s)://` scheme.
pub fn normalize_user(user: UserProfile) -> Result<UserProfile, ConfigError> {
    let name = user.name.trim().to_string();
    let email = user.email.trim().to_string();
    let url = user
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    if name.is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    validate_email(&email)?;
    if let Some(u) = &url {
        validate_url(u)?;
    }
    Ok(UserProfile { name, email, url })
}

/// An email must be non-empty and contain `@` with text on both sides.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] describing the problem.
pub fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(invalid("email", "must not be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(invalid("email", "must contain '@'")),
    }
}

/// # Errors
///
/// Returns [`ConfigError::Invalid`] unless the URL starts with `http://` or
/// `https://`.
pub fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(invalid("url", "must start with http:// or https://"))
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
