//! Persistence layer for the product catalog.
//!
//! - [`models`]: entity structs, create/update DTOs and their mappers
//! - [`record`]: the [`record::CatalogRecord`] trait the repositories are written against
//! - [`repositories`]: PostgreSQL and in-memory implementations behind [`CatalogStore`]

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod record;
pub mod repositories;

pub use error::StoreError;
pub use repositories::CatalogStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
