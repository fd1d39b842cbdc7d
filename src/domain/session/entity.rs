//! Session entity and token type

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::account::AccountId;

/// Random bytes behind every session token
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Length of a token once encoded as unpadded base64url
pub const SESSION_TOKEN_LENGTH: usize = 43;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

const FINGERPRINT_LENGTH: usize = 8;

/// Reasons a claimed session token is rejected before any lookup
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionValidationError {
    #[error("Session token cannot be empty")]
    Empty,

    #[error("Session token must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Session token contains characters outside the base64url alphabet")]
    InvalidCharacters,
}

/// Opaque, unguessable session identifier.
///
/// `Debug` only shows a short fingerprint so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Check that a client-supplied value has the shape of an issued token
    pub fn parse(raw: &str) -> Result<Self, SessionValidationError> {
        if raw.is_empty() {
            return Err(SessionValidationError::Empty);
        }

        if raw.len() != SESSION_TOKEN_LENGTH {
            return Err(SessionValidationError::InvalidLength {
                expected: SESSION_TOKEN_LENGTH,
                actual: raw.len(),
            });
        }

        if !TOKEN_PATTERN.is_match(raw) {
            return Err(SessionValidationError::InvalidCharacters);
        }

        Ok(Self(raw.to_string()))
    }

    pub(crate) fn from_issued(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, safe to log
    pub fn fingerprint(&self) -> &str {
        self.0.get(..FINGERPRINT_LENGTH).unwrap_or(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({}…)", self.fingerprint())
    }
}

/// A server-side session. Owned by the session store; the account is only
/// referenced by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: SessionToken,
    account_id: AccountId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session now, valid for `ttl`
    pub fn new(token: SessionToken, account_id: AccountId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            token,
            account_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Rebuild a session loaded from storage
    pub fn restore(
        token: SessionToken,
        account_id: AccountId,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            account_id,
            created_at,
            expires_at,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOKEN: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJ0123-_Q";

    #[test]
    fn test_parse_valid_token() {
        let token = SessionToken::parse(VALID_TOKEN).unwrap();
        assert_eq!(token.as_str(), VALID_TOKEN);
    }

    #[test]
    fn test_parse_empty_token() {
        assert_eq!(SessionToken::parse(""), Err(SessionValidationError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            SessionToken::parse("short"),
            Err(SessionValidationError::InvalidLength {
                expected: SESSION_TOKEN_LENGTH,
                actual: 5
            })
        );
    }

    #[test]
    fn test_parse_invalid_characters() {
        let token = format!("{}=", &VALID_TOKEN[..42]);
        assert_eq!(
            SessionToken::parse(&token),
            Err(SessionValidationError::InvalidCharacters)
        );
    }

    #[test]
    fn test_debug_shows_only_fingerprint() {
        let token = SessionToken::parse(VALID_TOKEN).unwrap();
        let debug = format!("{:?}", token);

        assert!(debug.contains("abcdefgh"));
        assert!(!debug.contains(VALID_TOKEN));
    }

    #[test]
    fn test_session_expiry() {
        let token = SessionToken::parse(VALID_TOKEN).unwrap();
        let session = Session::new(token, AccountId::new(1), Duration::hours(24));

        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at()));
        assert!(session.is_expired_at(session.created_at() + Duration::hours(25)));
        assert_eq!(session.expires_at() - session.created_at(), Duration::hours(24));
    }
}
