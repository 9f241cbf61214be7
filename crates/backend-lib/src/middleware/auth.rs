// ============================
// chatd-backend-lib/src/middleware/auth.rs
// ============================
//! Auth gate: converts the session cookie into a trusted identity, or
//! rejects the call before it reaches business logic. Purely
//! request-scoped; holds no state between calls.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;
use chatd_common::UserProfile;

/// Identity resolved by the auth gate, password hash already stripped.
/// Handlers behind the gate read this from request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// Reject unauthenticated requests; attach [`CurrentUser`] otherwise.
///
/// Order of checks: cookie present -> token verifies -> user still exists.
/// Each failure maps to its own status (401 / 401 / 404).
pub async fn require_auth<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar.get(SESSION_COOKIE).ok_or(AppError::NoToken)?;

    let user_id = state.tokens.verify(token.value())?;

    let record = state
        .storage
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::UserGone)?;

    request.extensions_mut().insert(CurrentUser(record.profile()));

    Ok(next.run(request).await)
}
