// ============================
// chatd-backend-lib/tests/common/mod.rs
// ============================
//! Shared harness: a real router over a temp-dir flat-file store.
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use chatd_backend_lib::{
    config::Settings, router::create_router, storage::FlatFileStorage, AppState,
};

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState<FlatFileStorage>>,
    _dir: TempDir,
}

pub fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        data_dir: dir.path().to_path_buf(),
        jwt_secret: "integration-test-secret".to_string(),
        ..Settings::default()
    };

    let storage = FlatFileStorage::new(dir.path()).unwrap();
    let state = Arc::new(AppState::new(storage, settings).unwrap());
    let app = create_router(state.clone());

    TestApp {
        app,
        state,
        _dir: dir,
    }
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Pull the `jwt=...` pair out of the Set-Cookie header.
#[allow(dead_code)]
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    assert!(pair.starts_with("jwt="));
    Some(pair.to_string())
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up a user and return (session cookie, profile body).
pub async fn signup(
    app: &Router,
    full_name: &str,
    email: &str,
    password: &str,
) -> (String, serde_json::Value) {
    let response = request(
        app,
        "POST",
        "/api/auth/signup",
        Some(serde_json::json!({
            "fullName": full_name,
            "email": email,
            "password": password,
        })),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie_pair(&response).expect("signup sets session cookie");
    let body = body_json(response).await;
    (cookie, body)
}
