// ============================
// chatd-backend-lib/src/error.rs
// ============================
//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized - no token provided")]
    NoToken,

    #[error("Unauthorized - invalid token")]
    InvalidToken,

    #[error("Unauthorized - token expired")]
    TokenExpired,

    #[error("User not found")]
    UserGone,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::EmailTaken
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NoToken | AppError::InvalidToken | AppError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            },
            AppError::UserGone | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::EmailTaken => "VAL_002",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::NoToken => "AUTH_002",
            AppError::InvalidToken => "AUTH_003",
            AppError::TokenExpired => "AUTH_004",
            AppError::UserGone => "NF_001",
            AppError::NotFound(_) => "NF_002",
            AppError::Upload(_) => "UP_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use.
    /// Upstream causes (IO, JSON, upload) are logged, never surfaced.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::EmailTaken => "Email already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::NoToken => "Unauthorized - no token provided".to_string(),
            AppError::InvalidToken | AppError::TokenExpired => {
                "Unauthorized - invalid token".to_string()
            },
            AppError::UserGone => "User not found".to_string(),
            AppError::NotFound(what) => format!("Not found: {what}"),
            AppError::Upload(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
