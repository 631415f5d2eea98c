use crate::models::Link;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id BIGSERIAL PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                target_url TEXT NOT NULL,
                total_clicks BIGINT NOT NULL DEFAULT 0,
                last_clicked BIGINT,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_code ON links(code)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn insert(&self, code: &str, target_url: &str) -> StorageResult<Link> {
        let created_at = chrono::Utc::now().timestamp();

        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (code, target_url, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, code, target_url, total_clicks, last_clicked, created_at
            "#,
        )
        .bind(code)
        .bind(target_url)
        .bind(created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(link)
    }

    async fn resolve_and_touch(&self, code: &str) -> Result<Option<String>> {
        let clicked_at = chrono::Utc::now().timestamp();

        let target_url = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE links
            SET total_clicks = total_clicks + 1, last_clicked = $1
            WHERE code = $2
            RETURNING target_url
            "#,
        )
        .bind(clicked_at)
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(target_url)
    }

    async fn get(&self, code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, target_url, total_clicks, last_clicked, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn delete(&self, code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            DELETE FROM links
            WHERE code = $1
            RETURNING id, code, target_url, total_clicks, last_clicked, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, target_url, total_clicks, last_clicked, created_at
            FROM links
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }
}
