// ============================
// chatd-backend-lib/src/ws.rs
// ============================
//! WebSocket connection handling: the live-push side of message delivery.
//! A connection's only job is to register its user in the presence registry
//! and forward queued [`ServerEvent`]s; all client-initiated traffic rides
//! the HTTP API.
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Extension,
};
use futures_util::{SinkExt, StreamExt};
use metrics::counter;
use tokio::sync::mpsc;
use tracing::info;

use crate::metrics as keys;
use crate::middleware::CurrentUser;
use crate::storage::Storage;
use crate::AppState;
use chatd_common::{ServerEvent, UserId};

/// Handler for `GET /ws` (auth-gated; the browser sends the session cookie
/// on the upgrade request).
pub async fn ws_handler<S: Storage + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    counter!(keys::WS_CONNECTION).increment(1);
    ws.on_upgrade(move |socket| handle_connection(socket, state, user.0.id))
}

async fn handle_connection<S: Storage + 'static>(
    socket: WebSocket,
    state: Arc<AppState<S>>,
    user_id: UserId,
) {
    let (mut sink, mut stream) = socket.split();

    // Bounded queue between the message router and this socket. try_send on
    // the router side keeps sends non-blocking; overflow drops the push.
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(32);
    state.presence.register(user_id, event_tx.clone());
    info!(user = %user_id, "websocket connected");

    // Forward queued events to the client as text frames.
    let send_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if sink.send(WsMessage::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain inbound frames until the peer closes or the stream errors so a
    // dropped connection unregisters promptly.
    while let Some(Ok(frame)) = stream.next().await {
        if let WsMessage::Close(_) = frame {
            break;
        }
    }

    // Guarded removal: if a newer connection already replaced us, leave its
    // registration alone.
    state.presence.unregister_handle(user_id, &event_tx);
    counter!(keys::WS_DISCONNECTION).increment(1);
    info!(user = %user_id, "websocket disconnected");

    send_task.abort();
}
