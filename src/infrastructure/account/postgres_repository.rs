//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::{Account, AccountId, AccountRepository, Email, HashedPassword};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

/// PostgreSQL implementation of AccountRepository over the `users` table
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> Result<Account, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id",
        )
        .bind(email.as_str())
        .bind(password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| create_error(email, e))?;

        Ok(Account::new(
            AccountId::new(id),
            email.clone(),
            password_hash.clone(),
        ))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query("SELECT id, email, password FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query("SELECT id, email, password FROM users WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }
}

/// A unique violation on insert means the email is taken
fn create_error(email: &Email, error: sqlx::Error) -> DomainError {
    if is_unique_violation(&error) {
        DomainError::duplicate_email(email.as_str())
    } else {
        DomainError::storage(format!("Failed to create account: {}", error))
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;
    let password: String = row
        .try_get("password")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;

    account_from_columns(id, &email, password)
}

fn account_from_columns(id: i64, email: &str, password: String) -> Result<Account, DomainError> {
    let email = Email::parse(email)
        .map_err(|e| DomainError::storage(format!("Invalid email in database: {}", e)))?;

    Ok(Account::new(
        AccountId::new(id),
        email,
        HashedPassword::from_phc(password),
    ))
}
