//! PostgreSQL session repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::session::{Session, SessionRepository, SessionToken};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

/// PostgreSQL implementation of SessionRepository over the `sessions` table
#[derive(Debug, Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.token().as_str())
        .bind(session.account_id().value())
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(create_error)?;

        Ok(())
    }

    async fn find(&self, token: &SessionToken) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, user_id, created_at, expires_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get session: {}", e)))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn delete(&self, token: &SessionToken) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to delete expired sessions: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}

/// A unique violation on insert means the token is already issued
fn create_error(error: sqlx::Error) -> DomainError {
    if is_unique_violation(&error) {
        DomainError::SessionCollision
    } else {
        DomainError::storage(format!("Failed to create session: {}", error))
    }
}

fn row_to_session(row: &PgRow) -> Result<Session, DomainError> {
    let token: String = row
        .try_get("session_id")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;
    let expires_at: DateTime<Utc> = row
        .try_get("expires_at")
        .map_err(|e| DomainError::storage(format!("Invalid session row: {}", e)))?;

    Ok(session_from_columns(token, user_id, created_at, expires_at))
}

fn session_from_columns(
    token: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Session {
    Session::restore(
        SessionToken::from_issued(token),
        AccountId::new(user_id),
        created_at,
        expires_at,
    )
}
