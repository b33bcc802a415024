//! Snapshot persistence for the user collection.
//!
//! A [`RecordStore`] only knows how to read and replace the whole collection.
//! Everything that mutates users goes through [`crate::database::Records`],
//! which layers the read-modify-write cycle on top.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::constants::SNAPSHOT_FILE_NAME;
use crate::models::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures on the read path (unreadable or malformed snapshot).
    pub fn is_read_error(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Malformed { .. })
    }
}

/// Whole-collection storage for users and their embedded expenses.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads the entire persisted collection.
    async fn load_all(&self) -> Result<Vec<User>, StoreError>;

    /// Replaces the entire persisted collection.
    async fn save_all(&self, users: &[User]) -> Result<(), StoreError>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.load_all().await?.into_iter().find(|u| u.id == id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.load_all().await?.into_iter().find(|u| u.email == email))
    }
}

/// Stores the collection as one pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Store backed by `users.json` inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(SNAPSHOT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<User>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First access: leave an empty snapshot behind.
                if let Err(e) = self.save_all(&[]).await {
                    warn!(error = %e, "could not create empty snapshot");
                }
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    async fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(users)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.write_error(e))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| self.write_error(e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.write_error(e))?;

        debug!(path = %self.path.display(), users = users.len(), "snapshot saved");
        Ok(())
    }
}

/// In-process store, useful in tests or as a stand-in for another backend.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    users: RwLock<Vec<User>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        MemoryRecordStore {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        *self.users.write().await = users.to_vec();
        Ok(())
    }
}
