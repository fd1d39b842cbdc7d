//! Account domain
//!
//! Registered identities: the account entity, its email and password-hash
//! newtypes, and the repository trait backing the account store.

mod entity;
mod password;
mod repository;
mod validation;

pub use entity::{Account, AccountId, Email};
pub use password::HashedPassword;
pub use repository::AccountRepository;
pub use validation::{normalize_email, validate_email, AccountValidationError};

#[cfg(test)]
pub use repository::MockAccountRepository;
