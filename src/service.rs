//! Link service: code issuance, redirect counting and link lifecycle.
//!
//! All business rules live here; the HTTP layers only translate requests
//! and responses. Uniqueness is never pre-checked before an insert: the
//! store's unique constraint is the single arbiter, so there is no
//! check-then-act window under concurrent creation.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use url::Url;

use crate::codegen;
use crate::models::Link;
use crate::storage::{Storage, StorageError};

/// Generation attempts before concluding the code space is saturated.
const MAX_GENERATE_ATTEMPTS: usize = 10;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid URL provided")]
    InvalidUrl,
    #[error("Code must be 6-8 characters long and contain only letters and numbers")]
    InvalidCode,
    #[error("Code already exists")]
    CodeAlreadyExists,
    #[error("could not allocate a unique short code")]
    CodeSpaceExhausted,
    #[error("Link not found")]
    NotFound,
    #[error("storage unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct LinkService {
    storage: Arc<dyn Storage>,
    schema_init: OnceCell<()>,
}

impl LinkService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            schema_init: OnceCell::new(),
        }
    }

    /// Run schema initialization once per process.
    ///
    /// Concurrent first callers wait on the same in-flight init instead of
    /// racing duplicate DDL; the statement itself is `IF NOT EXISTS`, so a
    /// process restart is also safe. A failed init is not latched and the
    /// next caller retries it.
    pub async fn ensure_schema(&self) -> ServiceResult<()> {
        self.schema_init
            .get_or_try_init(|| async {
                self.storage
                    .init()
                    .await
                    .map_err(ServiceError::StoreUnavailable)
            })
            .await?;
        Ok(())
    }

    /// Create a link for `target_url`, under `custom_code` if given,
    /// otherwise under a freshly generated code.
    pub async fn create_link(
        &self,
        target_url: &str,
        custom_code: Option<&str>,
    ) -> ServiceResult<Link> {
        self.ensure_schema().await?;

        if !is_absolute_url(target_url) {
            return Err(ServiceError::InvalidUrl);
        }

        if let Some(code) = custom_code {
            if !codegen::is_valid_custom_code(code) {
                return Err(ServiceError::InvalidCode);
            }

            // The caller asked for this exact code; a collision is final.
            return match self.storage.insert(code, target_url).await {
                Ok(link) => Ok(link),
                Err(StorageError::Conflict) => Err(ServiceError::CodeAlreadyExists),
                Err(StorageError::Other(err)) => Err(ServiceError::StoreUnavailable(err)),
            };
        }

        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = codegen::generate_code();
            match self.storage.insert(&code, target_url).await {
                Ok(link) => return Ok(link),
                Err(StorageError::Conflict) => {
                    // Only a confirmed collision earns another attempt
                    tracing::debug!(attempt, "generated code collided, retrying");
                }
                Err(StorageError::Other(err)) => return Err(ServiceError::StoreUnavailable(err)),
            }
        }

        tracing::warn!(
            attempts = MAX_GENERATE_ATTEMPTS,
            "exhausted short code generation attempts"
        );
        Err(ServiceError::CodeSpaceExhausted)
    }

    /// Resolve `code` to its destination, counting the click.
    ///
    /// The increment, the `last_clicked` stamp and the URL fetch are one
    /// store statement, so concurrent resolutions never lose an update.
    pub async fn resolve_and_count(&self, code: &str) -> ServiceResult<String> {
        self.ensure_schema().await?;

        self.storage
            .resolve_and_touch(code)
            .await
            .map_err(ServiceError::StoreUnavailable)?
            .ok_or(ServiceError::NotFound)
    }

    /// Read-only lookup; does not count a click.
    pub async fn get_link(&self, code: &str) -> ServiceResult<Link> {
        self.ensure_schema().await?;

        self.storage
            .get(code)
            .await
            .map_err(ServiceError::StoreUnavailable)?
            .ok_or(ServiceError::NotFound)
    }

    /// Delete a link, returning the removed record.
    pub async fn delete_link(&self, code: &str) -> ServiceResult<Link> {
        self.ensure_schema().await?;

        self.storage
            .delete(code)
            .await
            .map_err(ServiceError::StoreUnavailable)?
            .ok_or(ServiceError::NotFound)
    }

    /// All links, newest first.
    pub async fn list_links(&self) -> ServiceResult<Vec<Link>> {
        self.ensure_schema().await?;

        self.storage
            .list()
            .await
            .map_err(ServiceError::StoreUnavailable)
    }
}

/// A target must parse as an absolute URL with a host; bare paths,
/// schemeless strings and host-less schemes are all rejected.
fn is_absolute_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageResult;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Storage whose inserts always report a uniqueness violation.
    struct ConflictingStorage {
        insert_attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Storage for ConflictingStorage {
        async fn init(&self) -> Result<()> {
            Ok(())
        }

        async fn insert(&self, _code: &str, _target_url: &str) -> StorageResult<Link> {
            self.insert_attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Conflict)
        }

        async fn resolve_and_touch(&self, _code: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn get(&self, _code: &str) -> Result<Option<Link>> {
            Ok(None)
        }

        async fn delete(&self, _code: &str) -> Result<Option<Link>> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<Link>> {
            Ok(vec![])
        }
    }

    /// Storage whose inserts fail with a non-conflict error.
    struct FailingStorage {
        insert_attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Storage for FailingStorage {
        async fn init(&self) -> Result<()> {
            Ok(())
        }

        async fn insert(&self, _code: &str, _target_url: &str) -> StorageResult<Link> {
            self.insert_attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Other(anyhow!("connection reset")))
        }

        async fn resolve_and_touch(&self, _code: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn get(&self, _code: &str) -> Result<Option<Link>> {
            Ok(None)
        }

        async fn delete(&self, _code: &str) -> Result<Option<Link>> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<Link>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn generated_codes_retry_up_to_the_bound_then_give_up() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let service = LinkService::new(Arc::new(ConflictingStorage {
            insert_attempts: Arc::clone(&attempts),
        }));

        let result = service.create_link("https://example.com", None).await;

        assert!(matches!(result, Err(ServiceError::CodeSpaceExhausted)));
        assert_eq!(attempts.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn custom_code_conflicts_never_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let service = LinkService::new(Arc::new(ConflictingStorage {
            insert_attempts: Arc::clone(&attempts),
        }));

        let result = service
            .create_link("https://example.com", Some("abc123"))
            .await;

        assert!(matches!(result, Err(ServiceError::CodeAlreadyExists)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_conflict_store_errors_fail_fast() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let service = LinkService::new(Arc::new(FailingStorage {
            insert_attempts: Arc::clone(&attempts),
        }));

        let result = service.create_link("https://example.com", None).await;

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn validation_happens_before_any_store_call() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let service = LinkService::new(Arc::new(ConflictingStorage {
            insert_attempts: Arc::clone(&attempts),
        }));

        let bad_url = service.create_link("not a url", None).await;
        assert!(matches!(bad_url, Err(ServiceError::InvalidUrl)));

        let bad_code = service
            .create_link("https://example.com", Some("bad code"))
            .await;
        assert!(matches!(bad_code, Err(ServiceError::InvalidCode)));

        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn absolute_url_check() {
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("http://example.com/path?q=1"));
        assert!(is_absolute_url("ftp://files.example.com"));

        assert!(!is_absolute_url(""));
        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("/relative/path"));
        assert!(!is_absolute_url("not a url"));
        assert!(!is_absolute_url("mailto:user@example.com"));
    }
}
