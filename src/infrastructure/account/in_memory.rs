//! In-memory account repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository, Email, HashedPassword};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<AccountId, Account>,
    /// email -> id, the uniqueness constraint
    email_index: HashMap<String, AccountId>,
    last_id: i64,
}

/// In-memory implementation of AccountRepository
///
/// Ids and the email index are updated under a single lock, so concurrent
/// registrations for one email cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Accounts>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an account. Used by tests to produce dangling sessions.
    #[cfg(test)]
    pub async fn remove(&self, id: AccountId) -> bool {
        let mut accounts = self.accounts.write().await;

        match accounts.by_id.remove(&id) {
            Some(account) => {
                accounts.email_index.remove(account.email().as_str());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.email_index.contains_key(email.as_str()) {
            return Err(DomainError::duplicate_email(email.as_str()));
        }

        accounts.last_id += 1;
        let id = AccountId::new(accounts.last_id);
        let account = Account::new(id, email.clone(), password_hash.clone());

        accounts.email_index.insert(email.as_str().to_string(), id);
        accounts.by_id.insert(id, account.clone());

        Ok(account)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;

        Ok(accounts
            .email_index
            .get(email.as_str())
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(&id).cloned())
    }
}
