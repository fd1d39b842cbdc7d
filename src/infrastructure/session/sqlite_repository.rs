//! SQLite session repository implementation
//!
//! Timestamps are stored as Unix seconds so expiry comparisons happen on
//! integers inside SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::session::{Session, SessionRepository, SessionToken};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

/// SQLite implementation of SessionRepository over the `sessions` table
#[derive(Debug, Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(session.token().as_str())
        .bind(session.account_id().value())
        .bind(session.created_at().timestamp())
        .bind(session.expires_at().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::SessionCollision
            } else {
                DomainError::storage(format!("Failed to create session: {}", e))
            }
        })?;

        Ok(())
    }

    async fn find(&self, token: &SessionToken) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, user_id, created_at, expires_at
            FROM sessions
            WHERE session_id = ?1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get session: {}", e)))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn delete(&self, token: &SessionToken) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = ?1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete expired sessions: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}

fn row_to_session(row: &SqliteRow) -> Result<Session, DomainError> {
    let token: String = row
        .try_get("session_id")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let expires_at: i64 = row
        .try_get("expires_at")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;

    Ok(Session::restore(
        SessionToken::from_issued(token),
        AccountId::new(user_id),
        from_unix(created_at)?,
        from_unix(expires_at)?,
    ))
}

fn from_unix(seconds: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| DomainError::storage(format!("Invalid timestamp in database: {}", seconds)))
}
