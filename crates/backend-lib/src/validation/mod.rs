// ============================
// chatd-backend-lib/src/validation/mod.rs
// ============================
//! Request validation for the auth endpoints. Failures name the violated
//! field so clients can surface a useful message.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::auth::MIN_PASSWORD_LENGTH;
use crate::error::AppError;
use crate::handlers::auth::SignupRequest;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validate a signup request: all fields present, password long enough,
/// email plausibly formed.
pub fn validate_signup(req: &SignupRequest) -> Result<(), AppError> {
    if req.full_name.trim().is_empty() {
        return Err(AppError::Validation("fullName is required".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !EMAIL_RE.is_match(req.email.trim()) {
        return Err(AppError::Validation("email is invalid".to_string()));
    }
    Ok(())
}
