//! Document store setup and initialization

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use vod_core::{Config, DocumentStoreBackend};
use vod_db::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};

/// Connect the configured document store, running migrations for Postgres.
pub async fn setup_document_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.document_store_backend() {
        DocumentStoreBackend::Postgres => {
            let url = config
                .database_url()
                .context("DATABASE_URL must be set for the postgres document store")?;

            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections())
                .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!(
                max_connections = config.db_max_connections(),
                "Database connected successfully"
            );

            // Workspace migrations/ relative to this crate
            let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
            let migrator = sqlx::migrate::Migrator::new(migrations_dir)
                .await
                .context("Failed to load migrations")?;
            migrator
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PostgresDocumentStore::new(pool)))
        }
        DocumentStoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; records are lost on restart");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}
