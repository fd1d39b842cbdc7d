//! Account repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Account, AccountId, Email};
use super::password::HashedPassword;
use crate::domain::DomainError;

/// Durable mapping from email to account record
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return it with its store-assigned id.
    ///
    /// Uniqueness is enforced by the store itself; a violation surfaces as
    /// `DomainError::DuplicateEmail`.
    async fn create(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> Result<Account, DomainError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError>;

    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError>;
}
