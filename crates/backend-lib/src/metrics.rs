// ==============
// chatd-backend-lib/src/metrics.rs

//! Central place for metric keys
pub const WS_CONNECTION: &str = "ws.connection";
pub const WS_DISCONNECTION: &str = "ws.disconnection";
pub const PRESENCE_ONLINE: &str = "presence.online";
pub const USER_SIGNUP: &str = "auth.signup";
pub const USER_LOGIN: &str = "auth.login";
pub const LOGIN_FAILED: &str = "auth.login_failed";
pub const MESSAGE_SENT: &str = "message.sent";
pub const MESSAGE_PUSHED: &str = "message.pushed";
pub const MESSAGE_PUSH_DROPPED: &str = "message.push_dropped";
