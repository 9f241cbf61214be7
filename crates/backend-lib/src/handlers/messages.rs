// ============================
// chatd-backend-lib/src/handlers/messages.rs
// ============================
//! Message routing: durable persistence first, then best-effort live push
//! to a connected recipient. A failed push is never retried and never rolls
//! back the write; the message stays retrievable via history.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use metrics::counter;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics as keys;
use crate::middleware::CurrentUser;
use crate::storage::Storage;
use crate::AppState;
use chatd_common::{Message, ServerEvent, UserId, UserProfile};

#[derive(Debug, Deserialize, Default)]
pub struct SendMessageRequest {
    /// Message text, if any.
    #[serde(default)]
    pub text: Option<String>,
    /// Inline image as a base64 data URI, if any.
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /api/messages/users` (auth-gated) — everyone except the requester,
/// for the conversation sidebar.
pub async fn sidebar_users<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.storage.list_users_except(user.0.id).await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

/// `GET /api/messages/{peer_id}` (auth-gated) — full two-way history with
/// the peer, creation order ascending, no pagination.
pub async fn get_messages<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<CurrentUser>,
    Path(peer_id): Path<UserId>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.storage.conversation(user.0.id, peer_id).await?;
    Ok(Json(messages))
}

/// `POST /api/messages/{peer_id}` (auth-gated)
///
/// 1. Upload the inline image, if any.
/// 2. Persist the message unconditionally.
/// 3. If the recipient is connected, push the persisted message.
/// 4. Return the message regardless of push outcome.
pub async fn send_message<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<CurrentUser>,
    Path(peer_id): Path<UserId>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let image_url = match req.image.as_deref() {
        Some(data_uri) if !data_uri.is_empty() => {
            Some(state.uploads.store_image(data_uri).await?)
        },
        _ => None,
    };

    // An empty message (no text, no image) is accepted and routed as-is.
    let message = Message {
        id: Uuid::new_v4(),
        sender_id: user.0.id,
        receiver_id: peer_id,
        text: req.text,
        image: image_url,
        created_at: Utc::now(),
    };

    state.storage.append_message(&message).await?;
    counter!(keys::MESSAGE_SENT).increment(1);

    if let Some(handle) = state.presence.lookup(peer_id) {
        match handle.try_send(ServerEvent::NewMessage {
            message: message.clone(),
        }) {
            Ok(()) => counter!(keys::MESSAGE_PUSHED).increment(1),
            Err(e) => {
                // Best-effort only: the recipient pulls it from history.
                counter!(keys::MESSAGE_PUSH_DROPPED).increment(1);
                debug!(receiver = %peer_id, "live push dropped: {e}");
            },
        }
    }

    Ok((StatusCode::CREATED, Json(message)))
}
