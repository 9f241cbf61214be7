// ============================
// chatd-backend-lib/src/upload.rs
// ============================
//! Object-storage collaborator. Accepts an inline base64 image payload and
//! returns a durable URL. The disk implementation stands in for a hosted
//! store; failures surface to callers as a generic server error.
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::fs as tokio_fs;
use uuid::Uuid;

use crate::error::AppError;

/// Trait for image object stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an inline image given as a `data:image/...;base64,...` URI and
    /// return the URL it will be served from.
    async fn store_image(&self, data_uri: &str) -> Result<String, AppError>;
}

/// Disk-backed implementation: decodes the payload under `root` and
/// addresses it beneath a configured public base URL.
#[derive(Clone)]
pub struct DiskObjectStore {
    root: PathBuf,
    public_base: String,
}

impl DiskObjectStore {
    pub fn new<P: AsRef<Path>>(root: P, public_base: String) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }
}

/// Split a data URI into (extension, base64 payload).
fn parse_data_uri(data_uri: &str) -> Result<(&str, &str), AppError> {
    let rest = data_uri
        .strip_prefix("data:image/")
        .ok_or_else(|| AppError::Upload("payload is not an image data URI".to_string()))?;

    let (mime_tail, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AppError::Upload("payload is not base64-encoded".to_string()))?;

    let ext = match mime_tail {
        "jpeg" => "jpg",
        other => other,
    };
    Ok((ext, payload))
}

#[async_trait]
impl ObjectStore for DiskObjectStore {
    async fn store_image(&self, data_uri: &str) -> Result<String, AppError> {
        let (ext, payload) = parse_data_uri(data_uri)?;

        let bytes = BASE64
            .decode(payload)
            .map_err(|e| AppError::Upload(format!("invalid base64 payload: {e}")))?;

        let name = format!("{}.{ext}", Uuid::new_v4());
        tokio_fs::write(self.root.join(&name), bytes).await?;

        Ok(format!("{}/{name}", self.public_base))
    }
}
