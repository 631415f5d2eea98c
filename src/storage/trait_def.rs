use crate::models::Link;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// Classify a sqlx error, separating uniqueness violations from every
    /// other failure so callers can tell a collision from an outage.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            _ => StorageError::Other(err.into()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the schema. Safe to call repeatedly and concurrently.
    async fn init(&self) -> Result<()>;

    /// Insert a new link. The unique constraint on `code` is the sole
    /// uniqueness check; a duplicate fails with [`StorageError::Conflict`].
    async fn insert(&self, code: &str, target_url: &str) -> StorageResult<Link>;

    /// In one statement: increment the click counter, stamp `last_clicked`
    /// and return the destination URL. `None` if the code is unknown, in
    /// which case no row changed.
    async fn resolve_and_touch(&self, code: &str) -> Result<Option<String>>;

    /// Look up a link by code.
    async fn get(&self, code: &str) -> Result<Option<Link>>;

    /// Delete a link, returning the removed row.
    async fn delete(&self, code: &str) -> Result<Option<Link>>;

    /// List all links, newest first.
    async fn list(&self) -> Result<Vec<Link>>;
}
