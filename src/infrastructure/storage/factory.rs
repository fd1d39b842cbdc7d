//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::account::AccountRepository;
use crate::domain::session::SessionRepository;
use crate::domain::DomainError;
use crate::infrastructure::account::{
    InMemoryAccountRepository, PostgresAccountRepository, SqliteAccountRepository,
};
use crate::infrastructure::session::{
    InMemorySessionRepository, PostgresSessionRepository, SqliteSessionRepository,
};

use super::postgres::{connect_postgres, PostgresConfig};
use super::schema::{ensure_postgres_schema, ensure_sqlite_schema};
use super::sqlite::{connect_sqlite, SqliteConfig};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (for testing/development)
    InMemory,
    /// SQLite file or in-memory database
    Sqlite,
    /// PostgreSQL storage
    Postgres,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Sqlite(SqliteConfig),
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        match self {
            Self::InMemory => StorageBackend::InMemory,
            Self::Sqlite(_) => StorageBackend::Sqlite,
            Self::Postgres(_) => StorageBackend::Postgres,
        }
    }
}

/// The account and session repositories of one backend
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
        }
    }
}

/// Factory for opening the configured backend
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Connect to the backend and bootstrap its schema
    pub async fn open(config: &StorageConfig) -> Result<Stores, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Stores::in_memory())
            }
            StorageConfig::Sqlite(sqlite) => {
                info!("Connecting to SQLite: {}", sqlite.url);
                let pool = connect_sqlite(sqlite).await?;
                ensure_sqlite_schema(&pool).await?;

                Ok(Stores {
                    accounts: Arc::new(SqliteAccountRepository::new(pool.clone())),
                    sessions: Arc::new(SqliteSessionRepository::new(pool)),
                })
            }
            StorageConfig::Postgres(postgres) => {
                info!("Connecting to PostgreSQL");
                let pool = connect_postgres(postgres).await?;
                ensure_postgres_schema(&pool).await?;

                Ok(Stores {
                    accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
                    sessions: Arc::new(PostgresSessionRepository::new(pool)),
                })
            }
        }
    }
}
