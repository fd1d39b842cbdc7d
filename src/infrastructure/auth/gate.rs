//! Authorization gate
//!
//! Decides whether a claimed session token identifies a live account.
//! Transport-agnostic: the HTTP layer extracts the token from a cookie or a
//! request body and hands it over as a plain string.

use tracing::debug;

use crate::domain::account::Account;
use crate::domain::session::SessionToken;
use crate::domain::DomainError;
use crate::infrastructure::session::SessionStore;

/// Fails closed: anything other than a resolvable, unexpired token is
/// `Unauthorized`. Storage failures are passed through unchanged.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    sessions: SessionStore,
}

impl AuthorizationGate {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    pub async fn authorize(&self, claimed: Option<&str>) -> Result<Account, DomainError> {
        let Some(raw) = claimed else {
            return Err(DomainError::unauthorized("Missing session token"));
        };

        let token = SessionToken::parse(raw).map_err(|e| {
            debug!("Rejected malformed session token: {}", e);
            DomainError::unauthorized("Invalid session token")
        })?;

        match self.sessions.resolve(&token).await? {
            Some(account) => Ok(account),
            None => {
                debug!("No live session for token {}", token.fingerprint());
                Err(DomainError::unauthorized("Invalid or expired session"))
            }
        }
    }
}
