// ================
// common/src/lib.rs
// ================
//! Shared wire types used by the `chatd` server and its clients.
//! Everything here is what actually crosses the HTTP/WebSocket boundary;
//! internal records (password hashes in particular) never appear in this
//! crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user identifier.
pub type UserId = Uuid;

/// Public view of a user, safe to send to any authenticated client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    /// Empty string until the user uploads a picture.
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single chat message. Immutable once created; there is no edit or
/// delete lifecycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    /// Message text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Durable URL of an attached image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Events pushed from server to client over the live WebSocket.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// A message addressed to this client was just persisted.
    NewMessage { message: Message },
}
