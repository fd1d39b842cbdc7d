//! Session domain
//!
//! Server-side sessions: the opaque token, the session record tying it to an
//! account with an explicit expiry, and the repository trait behind the
//! session store.

mod entity;
mod repository;

pub use entity::{
    Session, SessionToken, SessionValidationError, SESSION_TOKEN_BYTES, SESSION_TOKEN_LENGTH,
};
pub use repository::SessionRepository;

#[cfg(test)]
pub use repository::MockSessionRepository;
