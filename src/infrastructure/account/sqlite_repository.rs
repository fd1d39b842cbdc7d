//! SQLite account repository implementation

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::account::{Account, AccountId, AccountRepository, Email, HashedPassword};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

/// SQLite implementation of AccountRepository over the `users` table
#[derive(Debug, Clone)]
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> Result<Account, DomainError> {
        let row = sqlx::query("INSERT INTO users (email, password) VALUES (?1, ?2) RETURNING id")
            .bind(email.as_str())
            .bind(password_hash.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::duplicate_email(email.as_str())
                } else {
                    DomainError::storage(format!("Failed to create account: {}", e))
                }
            })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to read account id: {}", e)))?;

        Ok(Account::new(
            AccountId::new(id),
            email.clone(),
            password_hash.clone(),
        ))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query("SELECT id, email, password FROM users WHERE email = ?1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query("SELECT id, email, password FROM users WHERE id = ?1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }
}

fn row_to_account(row: &SqliteRow) -> Result<Account, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;
    let password: String = row
        .try_get("password")
        .map_err(|e| DomainError::storage(format!("Invalid account row: {}", e)))?;

    let email = Email::parse(&email)
        .map_err(|e| DomainError::storage(format!("Invalid email in database: {}", e)))?;

    Ok(Account::new(
        AccountId::new(id),
        email,
        HashedPassword::from_phc(password),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{connect_sqlite, ensure_sqlite_schema, SqliteConfig};

    async fn create_repository() -> SqliteAccountRepository {
        let pool = connect_sqlite(&SqliteConfig::in_memory()).await.unwrap();
        ensure_sqlite_schema(&pool).await.unwrap();
        SqliteAccountRepository::new(pool)
    }

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    fn hash() -> HashedPassword {
        HashedPassword::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = create_repository().await;

        let created = repo.create(&email("a@x.com"), &hash()).await.unwrap();
        assert!(created.id().value() > 0);

        let by_email = repo.get_by_email(&email("a@x.com")).await.unwrap();
        assert_eq!(by_email, Some(created.clone()));

        let by_id = repo.get_by_id(created.id()).await.unwrap();
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn test_absent_lookups() {
        let repo = create_repository().await;

        assert!(repo.get_by_email(&email("nobody@x.com")).await.unwrap().is_none());
        assert!(repo.get_by_id(AccountId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraint_surfaces_as_duplicate_email() {
        let repo = create_repository().await;
        let first = repo.create(&email("a@x.com"), &hash()).await.unwrap();

        let result = repo.create(&email("a@x.com"), &hash()).await;
        assert_eq!(result, Err(DomainError::duplicate_email("a@x.com")));

        let unaffected = repo.get_by_id(first.id()).await.unwrap();
        assert_eq!(unaffected, Some(first));
    }
}
