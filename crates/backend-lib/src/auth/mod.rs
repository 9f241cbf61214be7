// ============================
// chatd-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: password hashing, session tokens, cookie transport.

pub mod cookie;
pub mod password;
pub mod token;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use token::{TokenError, TokenService};
