// ============================
// chatd-backend-lib/src/router.rs
// ============================
//! Route table. Everything except signup/login/logout sits behind the auth
//! gate.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, messages};
use crate::middleware::require_auth;
use crate::storage::Storage;
use crate::ws;
use crate::AppState;

/// Create the application router.
pub fn create_router<S: Storage + 'static>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/api/auth/check", get(auth::check_auth))
        .route("/api/auth/update-profile", put(auth::update_profile::<S>))
        .route("/api/messages/users", get(messages::sidebar_users::<S>))
        .route(
            "/api/messages/{peer_id}",
            get(messages::get_messages::<S>).post(messages::send_message::<S>),
        )
        .route("/ws", get(ws::ws_handler::<S>))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .route("/api/auth/signup", post(auth::signup::<S>))
        .route("/api/auth/login", post(auth::login::<S>))
        .route("/api/auth/logout", post(auth::logout::<S>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
