// ============================
// chatd-backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers, grouped by route prefix.

pub mod auth;
pub mod messages;
