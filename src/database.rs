use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::User;
use crate::store::{JsonFileStore, RecordStore, StoreError};

pub type Db = Arc<Records>;

/// Shared handle over a [`RecordStore`].
///
/// Mutations run load → modify → save while holding `write_gate`, so two
/// requests in this process cannot overwrite each other's changes. Reads go
/// straight to the store.
pub struct Records {
    store: Arc<dyn RecordStore>,
    write_gate: Mutex<()>,
    strict_reads: bool,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Records {
            store,
            write_gate: Mutex::new(()),
            strict_reads: false,
        }
    }

    /// When enabled, an unreadable snapshot fails the request instead of
    /// reading as an empty collection.
    pub fn with_strict_reads(mut self, strict_reads: bool) -> Self {
        self.strict_reads = strict_reads;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    fn apply_read_policy<T: Default>(&self, result: Result<T, StoreError>) -> Result<T, AppError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if self.strict_reads => Err(AppError::StorageRead(e)),
            Err(e) => {
                warn!(error = %e, "unreadable snapshot treated as empty");
                Ok(T::default())
            }
        }
    }

    pub async fn load_users(&self) -> Result<Vec<User>, AppError> {
        self.apply_read_policy(self.store.load_all().await)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.apply_read_policy(self.store.find_user_by_id(id).await)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.apply_read_policy(self.store.find_user_by_email(email).await)
    }

    /// Runs one read-modify-write cycle over the whole collection.
    ///
    /// Nothing is saved when `f` returns an error.
    pub async fn modify<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<User>) -> Result<T, AppError>,
    {
        let _guard = self.write_gate.lock().await;

        let mut users = self.load_users().await?;
        let output = f(&mut users)?;
        self.store
            .save_all(&users)
            .await
            .map_err(AppError::StorageWrite)?;

        Ok(output)
    }

    /// Like [`Records::modify`] but scoped to one user. An unknown id fails
    /// with [`AppError::UserNotFound`] before `f` runs, so input checks made
    /// inside `f` never mask a missing user.
    pub async fn modify_user<T, F>(&self, user_id: &str, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut User) -> Result<T, AppError>,
    {
        self.modify(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(AppError::UserNotFound)?;
            f(user)
        })
        .await
    }
}

/// Opens the snapshot under `data_dir`, creating it if it does not exist yet.
pub async fn init_records(data_dir: &str, strict_reads: bool) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let store = JsonFileStore::in_dir(data_dir);

    match store.load_all().await {
        Ok(users) => info!(path = %store.path().display(), users = users.len(), "snapshot loaded"),
        Err(e) if strict_reads => return Err(e.into()),
        Err(e) => warn!(error = %e, "snapshot unreadable at startup; it will read as empty"),
    }

    let records = Records::new(Arc::new(store)).with_strict_reads(strict_reads);
    Ok(Arc::new(records))
}
