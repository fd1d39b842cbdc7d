//! Domain layer - accounts, sessions and the errors they raise

pub mod account;
pub mod error;
pub mod session;

pub use account::{Account, AccountId, AccountRepository, Email, HashedPassword};
pub use error::DomainError;
pub use session::{Session, SessionRepository, SessionToken};
