use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not open its first connection.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// An established pool stopped answering.
    #[error("database unreachable: {0}")]
    Unreachable(#[source] sqlx::Error),

    /// Bundled migrations could not be read or applied.
    #[error("migration failed: {0}")]
    Migrate(#[from] MigrateError),
}
