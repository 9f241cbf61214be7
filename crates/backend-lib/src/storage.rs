// ============================
// chatd-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::RwLock};
use uuid::Uuid;

use crate::error::AppError;
use chatd_common::{Message, UserId, UserProfile};

/// Internal user record. Carries the password hash and therefore never
/// crosses the wire; project to [`UserProfile`] before responding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    #[serde(default)]
    pub profile_pic: String,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl UserRecord {
    /// Public projection with the password hash stripped.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            profile_pic: self.profile_pic.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Trait for credential + message storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a user. Enforces email uniqueness atomically at write time;
    /// callers may pre-check for a friendlier fast path, but this is the
    /// authoritative check.
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError>;

    /// Look up a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, AppError>;

    /// Replace a user's profile picture URL.
    async fn set_profile_pic(&self, id: UserId, url: &str) -> Result<UserRecord, AppError>;

    /// All users except the given one, for the sidebar listing.
    async fn list_users_except(&self, id: UserId) -> Result<Vec<UserRecord>, AppError>;

    /// Durably append a message to its conversation log.
    async fn append_message(&self, message: &Message) -> Result<(), AppError>;

    /// Full two-way conversation between two users, creation order ascending.
    async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, AppError>;
}

/// Flat-file implementation of the Storage trait.
///
/// Layout under the root directory:
///   users/<id>.json          one record per user
///   messages/<lo>-<hi>.log   JSON lines, one per message, append order =
///                            creation order
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    /// lowercased email -> user id; the uniqueness authority for
    /// `create_user`. Rebuilt from `users/` at startup.
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Conversation file name, identical regardless of who sent first.
fn pair_key(a: UserId, b: UserId) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}-{hi}")
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        fs::create_dir_all(root.join("messages"))?;

        let mut index = HashMap::new();
        for entry in fs::read_dir(root.join("users"))? {
            let entry = entry?;
            if entry.path().extension().map_or(true, |e| e != "json") {
                continue;
            }
            let content = fs::read_to_string(entry.path())?;
            let record: UserRecord = serde_json::from_str(&content)?;
            index.insert(email_key(&record.email), record.id);
        }

        Ok(Self {
            root,
            email_index: Arc::new(RwLock::new(index)),
        })
    }

    fn user_path(&self, id: UserId) -> PathBuf {
        self.root.join("users").join(format!("{id}.json"))
    }

    fn conversation_path(&self, a: UserId, b: UserId) -> PathBuf {
        self.root
            .join("messages")
            .join(format!("{}.log", pair_key(a, b)))
    }

    async fn write_user(&self, record: &UserRecord) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(record)?;
        tokio_fs::write(self.user_path(record.id), json).await?;
        Ok(())
    }

    async fn read_user(&self, id: UserId) -> Result<Option<UserRecord>, AppError> {
        match tokio_fs::read_to_string(self.user_path(id)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError> {
        let key = email_key(email);

        // Hold the write lock across check + insert so two concurrent
        // signups with the same email cannot both pass.
        let mut index = self.email_index.write().await;
        if index.contains_key(&key) {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            full_name: full_name.to_string(),
            password_hash: password_hash.to_string(),
            profile_pic: String::new(),
            created_at: now,
            updated_at: now,
        };

        self.write_user(&record).await?;
        index.insert(key, record.id);

        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let id = {
            let index = self.email_index.read().await;
            index.get(&email_key(email)).copied()
        };
        match id {
            Some(id) => self.read_user(id).await,
            None => Ok(None),
        }
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, AppError> {
        self.read_user(id).await
    }

    async fn set_profile_pic(&self, id: UserId, url: &str) -> Result<UserRecord, AppError> {
        let mut record = self.read_user(id).await?.ok_or(AppError::UserGone)?;
        record.profile_pic = url.to_string();
        record.updated_at = Utc::now();
        self.write_user(&record).await?;
        Ok(record)
    }

    async fn list_users_except(&self, id: UserId) -> Result<Vec<UserRecord>, AppError> {
        let mut users = Vec::new();
        let mut entries = tokio_fs::read_dir(self.root.join("users")).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().map_or(true, |e| e != "json") {
                continue;
            }
            let content = tokio_fs::read_to_string(entry.path()).await?;
            let record: UserRecord = serde_json::from_str(&content)?;
            if record.id != id {
                users.push(record);
            }
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn append_message(&self, message: &Message) -> Result<(), AppError> {
        let path = self.conversation_path(message.sender_id, message.receiver_id);

        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        // Single write of line + newline so concurrent appends to the same
        // conversation never interleave mid-record.
        let line = format!("{}\n", serde_json::to_string(message)?);
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, AppError> {
        let path = self.conversation_path(a, b);
        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut messages = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            messages.push(serde_json::from_str(line)?);
        }
        Ok(messages)
    }
}
