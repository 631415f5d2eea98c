use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use tinylink::config::{Config, DatabaseBackend};
use tinylink::service::LinkService;
use tinylink::storage::{PostgresStorage, SqliteStorage, Storage};
use tinylink::{api, redirect};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    let service = Arc::new(LinkService::new(storage));

    // Warm the one-time schema guard before accepting traffic
    info!("Initializing database...");
    service.ensure_schema().await?;
    info!("Database initialized successfully");

    // Redirects at the root, management API under /links
    let app = redirect::create_redirect_router(Arc::clone(&service))
        .merge(api::create_api_router(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
