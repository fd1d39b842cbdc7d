//! Session Auth
//!
//! Session-based authentication for a web backend:
//! - Account registration with Argon2id password hashing
//! - Login issuing opaque, server-side sessions with expiry
//! - Logout by session revocation
//! - A session gate in front of protected routes
//! - SQLite, PostgreSQL or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::{AppState, SessionCookies};
use infrastructure::account::{AccountService, Argon2Hasher};
use infrastructure::session::SessionStore;
use infrastructure::storage::StorageFactory;

/// Build the application state from configuration.
///
/// Fails when the cookie secret is missing or the store is unreachable.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;
    let secret = config.auth.cookie_secret()?;

    let storage = config.database.storage_config()?;
    info!("Storage backend: {:?}", storage.backend());
    let stores = StorageFactory::open(&storage).await?;

    let ttl = config.session.ttl();
    let sessions = SessionStore::new(stores.sessions, stores.accounts.clone(), ttl);
    let accounts = AccountService::new(stores.accounts, sessions, Arc::new(Argon2Hasher::new()));
    let cookies = SessionCookies::new(
        &secret,
        config.session.cookie_name.clone(),
        ttl,
        config.session.secure_cookie,
    )?;

    Ok(AppState::new(accounts, cookies))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.backend = "memory".to_string();
        config.auth.cookie_secret = Some("0123456789abcdef0123456789abcdef".to_string());
        config
    }

    #[tokio::test]
    async fn test_create_app_state() {
        let state = create_app_state(&memory_config()).await.unwrap();

        assert_eq!(state.cookies.name(), "SESSION_ID");
        assert_eq!(state.accounts.sessions().ttl(), chrono::Duration::hours(24));
    }

    #[tokio::test]
    async fn test_create_app_state_rejects_short_secret() {
        let mut config = memory_config();
        config.auth.cookie_secret = Some("too-short".to_string());

        assert!(create_app_state(&config).await.is_err());
    }
}
