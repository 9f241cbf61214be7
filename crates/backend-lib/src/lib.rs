// ============================
// chatd-backend-lib/src/lib.rs
// ============================
//! Core functionality for the `chatd` chat server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod presence;
pub mod router;
pub mod storage;
pub mod upload;
pub mod validation;
pub mod ws;

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::presence::PresenceRegistry;
use crate::upload::{DiskObjectStore, ObjectStore};

/// Application state shared across all handlers.
pub struct AppState<S> {
    /// Credential and message store.
    pub storage: S,
    /// Session token issuer/verifier.
    pub tokens: TokenService,
    /// Live user -> connection mapping, process lifetime, never persisted.
    pub presence: PresenceRegistry,
    /// Object-storage collaborator for inline image payloads.
    pub uploads: Arc<dyn ObjectStore>,
    /// Settings manager.
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    /// Create a new application state with a disk-backed object store
    /// rooted under the configured data directory.
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        let uploads = Arc::new(DiskObjectStore::new(
            settings.data_dir.join("uploads"),
            settings.upload_base_url.clone(),
        )?);
        Self::with_uploads(storage, settings, uploads)
    }

    /// Create an application state with an explicit object store.
    pub fn with_uploads(
        storage: S,
        settings: Settings,
        uploads: Arc<dyn ObjectStore>,
    ) -> anyhow::Result<Self> {
        let tokens = TokenService::new(
            settings.jwt_secret.as_bytes(),
            std::time::Duration::from_secs(settings.token_ttl_secs),
        );

        Ok(Self {
            storage,
            tokens,
            presence: PresenceRegistry::new(),
            uploads,
            settings: Arc::new(settings),
        })
    }
}
