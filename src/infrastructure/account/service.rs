//! Account service: registration, login and logout

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::account::{Account, AccountRepository, Email, HashedPassword};
use crate::domain::session::{Session, SessionToken};
use crate::domain::DomainError;
use crate::infrastructure::session::SessionStore;

use super::password::PasswordHasher;

/// An account together with the session just issued for it
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSession {
    pub account: Account,
    pub session: Session,
}

/// Composes the hasher, the account store and the session store
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    sessions: SessionStore,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("sessions", &self.sessions)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: SessionStore,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Create an account and sign it in.
    ///
    /// The account and its first session are written separately. If the
    /// session cannot be created the account still exists and the caller can
    /// log in later.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountSession, DomainError> {
        let email = Email::parse(email).map_err(|e| DomainError::validation(e.to_string()))?;
        let password_hash = self.hash(password).await?;

        let account = self
            .accounts
            .create(&email, &password_hash)
            .await
            .map_err(|e| match e {
                DomainError::DuplicateEmail { email } => {
                    info!("Registration rejected, email already registered");
                    DomainError::account_exists(email)
                }
                other => other,
            })?;

        info!("Account registered: id={}", account.id());

        let session = self.sessions.create(account.id()).await.inspect_err(|e| {
            error!(
                "Account {} registered but session creation failed: {}",
                account.id(),
                e
            )
        })?;

        Ok(AccountSession { account, session })
    }

    /// Check credentials and issue a new session.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccountSession, DomainError> {
        let Ok(email) = Email::parse(email) else {
            warn!("Login failed");
            return Err(DomainError::InvalidCredentials);
        };

        let Some(account) = self.accounts.get_by_email(&email).await? else {
            warn!("Login failed");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.verify(password, account.password_hash()).await? {
            warn!("Login failed");
            return Err(DomainError::InvalidCredentials);
        }

        let session = self.sessions.create(account.id()).await?;
        info!("Account logged in: id={}", account.id());

        Ok(AccountSession { account, session })
    }

    /// Revoke a session. Returns whether one actually existed.
    pub async fn logout(&self, token: &SessionToken) -> Result<bool, DomainError> {
        let removed = self.sessions.revoke(token).await? > 0;

        if removed {
            info!("Session logged out: token={}", token.fingerprint());
        }

        Ok(removed)
    }

    async fn hash(&self, password: &str) -> Result<HashedPassword, DomainError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, DomainError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::account::MockAccountRepository;
    use crate::infrastructure::account::{Argon2Hasher, HashCost, InMemoryAccountRepository};
    use crate::infrastructure::session::InMemorySessionRepository;

    fn create_service() -> AccountService {
        let accounts: Arc<dyn AccountRepository> = Arc::new(InMemoryAccountRepository::new());
        let sessions = SessionStore::new(
            Arc::new(InMemorySessionRepository::new()),
            accounts.clone(),
            Duration::hours(24),
        );

        AccountService::new(
            accounts,
            sessions,
            Arc::new(Argon2Hasher::with_cost(HashCost::minimal())),
        )
    }

    #[tokio::test]
    async fn test_register_returns_account_and_session() {
        let service = create_service();

        let registered = service.register("a@x.com", "longpass1").await.unwrap();

        assert_eq!(registered.account.email().as_str(), "a@x.com");
        assert_eq!(registered.session.account_id(), registered.account.id());
        assert_ne!(registered.account.password_hash().as_str(), "longpass1");

        let resolved = service
            .sessions()
            .resolve(registered.session.token())
            .await
            .unwrap();
        assert_eq!(resolved, Some(registered.account));
    }

    #[tokio::test]
    async fn test_register_twice_is_account_exists() {
        let service = create_service();
        let first = service.register("a@x.com", "longpass1").await.unwrap();

        let result = service.register("a@x.com", "otherpass2").await;
        assert_eq!(result, Err(DomainError::account_exists("a@x.com")));

        // The original account and password are untouched
        let login = service.login("a@x.com", "longpass1").await.unwrap();
        assert_eq!(login.account, first.account);
    }

    #[tokio::test]
    async fn test_register_is_case_insensitive_on_email() {
        let service = create_service();
        service.register("a@x.com", "longpass1").await.unwrap();

        let result = service.register("  A@X.com ", "longpass1").await;
        assert!(matches!(result, Err(DomainError::AccountExists { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let service = create_service();

        let result = service.register("not-an-email", "longpass1").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_login_issues_a_new_session() {
        let service = create_service();
        let registered = service.register("a@x.com", "longpass1").await.unwrap();

        let login = service.login("A@x.com", "longpass1").await.unwrap();

        assert_eq!(login.account.id(), registered.account.id());
        assert_ne!(login.session.token(), registered.session.token());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = create_service();
        service.register("a@x.com", "longpass1").await.unwrap();

        let unknown = service.login("nobody@x.com", "longpass1").await;
        let wrong = service.login("a@x.com", "wrongpass1").await;

        assert_eq!(unknown, Err(DomainError::InvalidCredentials));
        assert_eq!(wrong, Err(DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_logout() {
        let service = create_service();
        let registered = service.register("a@x.com", "longpass1").await.unwrap();
        let token = registered.session.token();

        assert!(service.logout(token).await.unwrap());
        assert!(service.sessions().resolve(token).await.unwrap().is_none());
        assert!(!service.logout(token).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_failure_during_login_is_not_invalid_credentials() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_get_by_email()
            .returning(|_| Err(DomainError::storage("connection reset")));
        let accounts: Arc<dyn AccountRepository> = Arc::new(accounts);

        let service = AccountService::new(
            accounts.clone(),
            SessionStore::new(
                Arc::new(InMemorySessionRepository::new()),
                accounts,
                Duration::hours(1),
            ),
            Arc::new(Argon2Hasher::with_cost(HashCost::minimal())),
        );

        let result = service.login("a@x.com", "longpass1").await;
        assert_eq!(result, Err(DomainError::storage("connection reset")));
    }
}
