// ============================
// chatd-backend-lib/src/middleware/mod.rs
// ============================
//! Middleware for the `chatd` server.

pub mod auth;

pub use auth::{require_auth, CurrentUser};
