//! Storage infrastructure - connection pools, schema bootstrap and backend
//! selection

mod factory;
mod postgres;
mod schema;
mod sqlite;

pub use factory::{StorageBackend, StorageConfig, StorageFactory, Stores};
pub use postgres::{connect_postgres, PostgresConfig};
pub use schema::{ensure_postgres_schema, ensure_sqlite_schema};
pub use sqlite::{connect_sqlite, SqliteConfig};

/// Whether a database error is a unique or primary key violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}
