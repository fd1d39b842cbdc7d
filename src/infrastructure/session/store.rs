//! Session store: issues, resolves and revokes sessions

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::session::{Session, SessionRepository, SessionToken};
use crate::domain::DomainError;

use super::generator::{RandomTokenGenerator, TokenGenerator};

/// Fresh tokens tried before a collision is reported as an internal error
pub const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Maps session tokens to accounts.
///
/// Sessions live in their own repository and reference accounts by id, so
/// resolving a token always reads the current account record.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<dyn SessionRepository>,
    accounts: Arc<dyn AccountRepository>,
    generator: Arc<dyn TokenGenerator>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("generator", &self.generator)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        accounts: Arc<dyn AccountRepository>,
        ttl: Duration,
    ) -> Self {
        Self::with_generator(sessions, accounts, Arc::new(RandomTokenGenerator::new()), ttl)
    }

    pub fn with_generator(
        sessions: Arc<dyn SessionRepository>,
        accounts: Arc<dyn AccountRepository>,
        generator: Arc<dyn TokenGenerator>,
        ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            accounts,
            generator,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for an account under a fresh token
    pub async fn create(&self, account_id: AccountId) -> Result<Session, DomainError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let session = Session::new(self.generator.generate(), account_id, self.ttl);

            match self.sessions.create(&session).await {
                Ok(()) => {
                    debug!(
                        "Session created: account_id={}, token={}",
                        account_id,
                        session.token().fingerprint()
                    );
                    return Ok(session);
                }
                Err(DomainError::SessionCollision) => {
                    warn!(
                        "Session token collision on attempt {}/{}",
                        attempt, MAX_TOKEN_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::internal(format!(
            "Could not issue a unique session token after {} attempts",
            MAX_TOKEN_ATTEMPTS
        )))
    }

    /// Find the account behind a token.
    ///
    /// Unknown and expired tokens resolve to `None`. An expired session is
    /// removed on the way out.
    pub async fn resolve(&self, token: &SessionToken) -> Result<Option<Account>, DomainError> {
        let Some(session) = self.sessions.find(token).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            debug!("Session expired: token={}", token.fingerprint());
            if let Err(e) = self.sessions.delete(token).await {
                warn!("Failed to remove expired session: {}", e);
            }
            return Ok(None);
        }

        let account = self.accounts.get_by_id(session.account_id()).await?;
        if account.is_none() {
            warn!(
                "Session references a missing account: account_id={}",
                session.account_id()
            );
        }

        Ok(account)
    }

    /// Delete a session. Returns how many sessions were removed (0 or 1).
    pub async fn revoke(&self, token: &SessionToken) -> Result<u64, DomainError> {
        let removed = self.sessions.delete(token).await?;
        debug!(
            "Session revoke: token={}, removed={}",
            token.fingerprint(),
            removed
        );
        Ok(removed)
    }

    /// Drop every session whose expiry has passed
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let purged = self.sessions.delete_expired(Utc::now()).await?;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }
}
