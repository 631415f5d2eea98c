use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use tinylink::config::{Config, DatabaseBackend};
use tinylink::storage::{PostgresStorage, SqliteStorage, Storage};

#[derive(Parser)]
#[command(name = "tinylink-admin")]
#[command(about = "TinyLink admin management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema
    Setup,
    /// List all links
    List,
    /// Delete a link by code
    Delete {
        /// Short code of the link to delete
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::Setup => {
            println!("✓ Database schema is ready");
        }
        Commands::List => {
            let links = storage.list().await?;
            if links.is_empty() {
                println!("No links found.");
            } else {
                println!("{:<10} {:<8} {:<25} {}", "Code", "Clicks", "Created", "Target");
                println!("{}", "-".repeat(80));
                for link in links {
                    let created = chrono::DateTime::from_timestamp(link.created_at, 0)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default();
                    println!(
                        "{:<10} {:<8} {:<25} {}",
                        link.code, link.total_clicks, created, link.target_url
                    );
                }
            }
        }
        Commands::Delete { code } => match storage.delete(&code).await? {
            Some(link) => {
                println!("✓ Deleted link '{}' -> {}", link.code, link.target_url);
            }
            None => {
                println!("⚠ No link found with code '{}'", code);
            }
        },
    }

    Ok(())
}
