//! Postgres pool and schema migrations.
//!
//! Queries against the internship tables live in [`crate::store::PgStore`];
//! this module only owns the pool and the migrations bundled with the crate.

mod error;

pub use error::DbError;

use std::path::PathBuf;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// How long a request waits for a pooled connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings. Loaded by [`crate::config::Config::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/ims".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// Directory holding the SQL migrations shipped with this crate.
pub fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Pooled Postgres connection.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.database_url)
            .await
            .map_err(DbError::Connect)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::Unreachable)?;
        Ok(())
    }

    /// Apply any bundled migration the database has not seen yet.
    pub async fn migrate(&self) -> Result<(), DbError> {
        let dir = migrations_dir();
        let migrator = Migrator::new(dir.clone()).await?;
        info!(
            migrations_dir = %dir.display(),
            available = migrator.iter().count(),
            "Applying migrations"
        );
        migrator.run(&self.pool).await?;
        Ok(())
    }
}
