// ============================
// chatd/src/main.rs
// ============================
//! Server entrypoint: settings, tracing, storage, serve.
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatd_backend_lib::{
    config::{Settings, DEV_JWT_SECRET},
    router::create_router,
    storage::FlatFileStorage,
    AppState,
};

#[derive(Parser)]
#[command(name = "chatd", about = "Minimal multi-user chat backend")]
struct Cli {
    /// Path to a TOML config file (env vars CHATD_* still apply on top)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match cli.config.as_deref() {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if settings.jwt_secret == DEV_JWT_SECRET {
        warn!("running with the default signing secret; set CHATD_JWT_SECRET in production");
    }

    let storage = FlatFileStorage::new(&settings.data_dir)?;
    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings)?);
    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
