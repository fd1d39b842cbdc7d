use thiserror::Error;

/// Failures raised by the account and session core.
///
/// "Not found" is never an error here: lookups return `Option` and only
/// `logout` reports a missing session, through its return value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The hashing primitive failed or stored hash material is malformed
    #[error("Hashing error: {message}")]
    Hashing { message: String },

    /// The account store rejected an insert on its unique email constraint
    #[error("Duplicate email: {email}")]
    DuplicateEmail { email: String },

    /// Registration conflict as reported to the caller
    #[error("An account already exists for {email}")]
    AccountExists { email: String },

    /// Unknown email or wrong password, deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// A freshly generated session token already exists; retry with a new one
    #[error("Session token collision")]
    SessionCollision,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn account_exists(email: impl Into<String>) -> Self {
        Self::AccountExists {
            email: email.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure is the caller's fault rather than the server's
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail { .. }
                | Self::AccountExists { .. }
                | Self::InvalidCredentials
                | Self::Unauthorized { .. }
                | Self::Validation { .. }
        )
    }
}
