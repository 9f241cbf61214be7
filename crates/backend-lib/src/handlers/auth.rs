// ============================
// chatd-backend-lib/src/handlers/auth.rs
// ============================
//! Account + session handlers: signup, login, logout, profile update,
//! session check.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::CookieJar;
use metrics::counter;
use serde::Deserialize;
use tracing::info;

use crate::auth::{clear_session_cookie, hash_password, session_cookie, verify_password};
use crate::error::AppError;
use crate::metrics as keys;
use crate::middleware::CurrentUser;
use crate::storage::Storage;
use crate::validation::validate_signup;
use crate::AppState;
use chatd_common::UserProfile;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub profile_pic: String,
}

/// `POST /api/auth/signup`
pub async fn signup<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>), AppError> {
    validate_signup(&req)?;

    // Fast-path hint only; create_user re-checks atomically.
    if state.storage.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let password_hash =
        hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let record = state
        .storage
        .create_user(&req.email, req.full_name.trim(), &password_hash)
        .await?;

    let token = state.tokens.issue(record.id)?;
    let jar = jar.add(session_cookie(
        token,
        state.tokens.ttl(),
        state.settings.cookie_secure,
    ));

    counter!(keys::USER_SIGNUP).increment(1);
    info!(user = %record.id, "user signed up");

    Ok((StatusCode::CREATED, jar, Json(record.profile())))
}

/// `POST /api/auth/login`
///
/// Unknown email and wrong password fail identically: a generic
/// invalid-credentials signal, nothing about which check tripped.
pub async fn login<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>), AppError> {
    let record = state
        .storage
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| {
            counter!(keys::LOGIN_FAILED).increment(1);
            AppError::InvalidCredentials
        })?;

    if !verify_password(&record.password_hash, &req.password) {
        counter!(keys::LOGIN_FAILED).increment(1);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(record.id)?;
    let jar = jar.add(session_cookie(
        token,
        state.tokens.ttl(),
        state.settings.cookie_secure,
    ));

    counter!(keys::USER_LOGIN).increment(1);
    info!(user = %record.id, "user logged in");

    Ok((StatusCode::OK, jar, Json(record.profile())))
}

/// `POST /api/auth/logout` — stateless tokens cannot be revoked server-side,
/// so logout is exactly a cookie clear.
pub async fn logout<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> (StatusCode, CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(clear_session_cookie(state.settings.cookie_secure));
    (
        StatusCode::OK,
        jar,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}

/// `PUT /api/auth/update-profile` (auth-gated)
pub async fn update_profile<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if req.profile_pic.is_empty() {
        return Err(AppError::Validation("profilePic is required".to_string()));
    }

    let url = state.uploads.store_image(&req.profile_pic).await?;
    let record = state.storage.set_profile_pic(user.0.id, &url).await?;

    Ok(Json(record.profile()))
}

/// `GET /api/auth/check` (auth-gated) — echo the identity the gate resolved.
pub async fn check_auth(Extension(user): Extension<CurrentUser>) -> Json<UserProfile> {
    Json(user.0)
}
