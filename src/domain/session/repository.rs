//! Session repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::entity::{Session, SessionToken};
use crate::domain::DomainError;

/// Durable mapping from session token to owning account
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session. A token that already exists fails with
    /// `DomainError::SessionCollision` and nothing is written.
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    async fn find(&self, token: &SessionToken) -> Result<Option<Session>, DomainError>;

    /// Delete a session, returning the number of rows removed (0 or 1)
    async fn delete(&self, token: &SessionToken) -> Result<u64, DomainError>;

    /// Delete every session whose expiry is at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
