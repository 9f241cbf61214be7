// ============================
// chatd-backend-lib/src/presence.rs
// ============================
//! Presence registry: live mapping from user id to the sender half of that
//! user's WebSocket push channel. Process lifetime, initialized empty,
//! never persisted.
use dashmap::DashMap;
use metrics::gauge;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::metrics as keys;
use chatd_common::{ServerEvent, UserId};

/// Handle used to push events at a connected user.
pub type ConnectionHandle = mpsc::Sender<ServerEvent>;

/// Concurrency-safe user -> connection table. Cheap to clone; all clones
/// share the same map.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<DashMap<UserId, ConnectionHandle>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle for a user. A prior handle for the same user is
    /// overwritten: last connection wins.
    pub fn register(&self, user: UserId, handle: ConnectionHandle) {
        self.inner.insert(user, handle);
        gauge!(keys::PRESENCE_ONLINE).set(self.inner.len() as f64);
    }

    /// Remove a user's handle. Idempotent: a no-op if absent.
    pub fn unregister(&self, user: UserId) {
        self.inner.remove(&user);
        gauge!(keys::PRESENCE_ONLINE).set(self.inner.len() as f64);
    }

    /// Remove the entry only if it still belongs to the given connection.
    /// A stale connection closing after being replaced must not evict its
    /// replacement.
    pub fn unregister_handle(&self, user: UserId, handle: &ConnectionHandle) {
        self.inner
            .remove_if(&user, |_, current| current.same_channel(handle));
        gauge!(keys::PRESENCE_ONLINE).set(self.inner.len() as f64);
    }

    /// Current handle for a user, if connected.
    pub fn lookup(&self, user: UserId) -> Option<ConnectionHandle> {
        self.inner.get(&user).map(|entry| entry.value().clone())
    }

    pub fn online_count(&self) -> usize {
        self.inner.len()
    }
}
