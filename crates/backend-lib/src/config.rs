// ============================
// chatd-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path (users, messages, uploads)
    pub data_dir: PathBuf,
    /// Log level / `EnvFilter` directive
    pub log_level: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token TTL in seconds
    pub token_ttl_secs: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    /// Off for local development over plain HTTP.
    pub cookie_secure: bool,
    /// Public base URL prefixed to stored upload paths
    pub upload_base_url: String,
}

/// Placeholder secret shipped in defaults; deployments must override it.
pub const DEV_JWT_SECRET: &str = "chatd-dev-secret-do-not-deploy";

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            cookie_secure: false,
            upload_base_url: "https://localhost/uploads".to_string(),
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `config.toml`, then `CHATD_*` env vars.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CHATD_"))
            .extract()?;

        Ok(settings)
    }
}
