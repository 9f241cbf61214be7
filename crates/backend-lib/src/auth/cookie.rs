// ============================
// chatd-backend-lib/src/auth/cookie.rs
// ============================
//! Session cookie transport. The token travels in an HTTP-only,
//! SameSite=Strict cookie so client-side script cannot read it and the
//! browser withholds it from cross-site requests.
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// Build the session cookie carrying a freshly issued token.
/// `secure` is off only for local development over plain HTTP.
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}

/// Expired replacement cookie used at logout: same attributes, empty
/// value, Max-Age 0 so the browser drops it immediately.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}
