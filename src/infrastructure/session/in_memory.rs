//! In-memory session repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::session::{Session, SessionRepository, SessionToken};
use crate::domain::DomainError;

/// In-memory implementation of SessionRepository
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(session.token()) {
            return Err(DomainError::SessionCollision);
        }

        sessions.insert(session.token().clone(), session.clone());
        Ok(())
    }

    async fn find(&self, token: &SessionToken) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).cloned())
    }

    async fn delete(&self, token: &SessionToken) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        Ok(u64::from(sessions.remove(token).is_some()))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| !session.is_expired_at(now));

        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::account::AccountId;
    use crate::infrastructure::session::{RandomTokenGenerator, TokenGenerator};

    fn create_session(ttl: Duration) -> Session {
        Session::new(RandomTokenGenerator::new().generate(), AccountId::new(1), ttl)
    }

    #[tokio::test]
    async fn test_create_find_delete() {
        let repo = InMemorySessionRepository::new();
        let session = create_session(Duration::hours(1));

        repo.create(&session).await.unwrap();
        assert_eq!(repo.find(session.token()).await.unwrap(), Some(session.clone()));

        assert_eq!(repo.delete(session.token()).await.unwrap(), 1);
        assert!(repo.find(session.token()).await.unwrap().is_none());
        assert_eq!(repo.delete(session.token()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_token_is_a_collision() {
        let repo = InMemorySessionRepository::new();
        let session = create_session(Duration::hours(1));

        repo.create(&session).await.unwrap();
        assert_eq!(
            repo.create(&session).await,
            Err(DomainError::SessionCollision)
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let repo = InMemorySessionRepository::new();
        let live = create_session(Duration::hours(1));
        let stale = create_session(Duration::seconds(-1));

        repo.create(&live).await.unwrap();
        repo.create(&stale).await.unwrap();

        assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 1);
        assert!(repo.find(live.token()).await.unwrap().is_some());
        assert!(repo.find(stale.token()).await.unwrap().is_none());
    }
}
