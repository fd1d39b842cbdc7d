//! Request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::account::{Account, AccountId, Email};

/// Apply the account email policy as a field validator
fn validate_account_email(email: &str) -> Result<(), ValidationError> {
    Email::parse(email).map(|_| ()).map_err(|_| {
        ValidationError::new("email").with_message("must be a valid email address".into())
    })
}

/// Body of `/register` and `/signin`
#[derive(Clone, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(custom(function = "validate_account_email"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body carrying a session token, for `/logout` and protected routes
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            email: account.email().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: AccountId,
    pub email: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub user: AccountResponse,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let valid = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "longpass1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "1234567".to_string(),
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_credentials_email_follows_account_policy() {
        let dotless = CredentialsRequest {
            email: "a@localhost".to_string(),
            password: "longpass1".to_string(),
        };
        let errors = dotless.validate().unwrap_err();
        let email_errors = &errors.field_errors()["email"];

        assert_eq!(email_errors[0].code, "email");
        assert_eq!(
            email_errors[0].message.as_deref(),
            Some("must be a valid email address")
        );

        let padded = CredentialsRequest {
            email: "  A@X.com ".to_string(),
            password: "longpass1".to_string(),
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let request = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "longpass1".to_string(),
        };

        assert!(!format!("{:?}", request).contains("longpass1"));
    }

    #[test]
    fn test_session_request_uses_camel_case() {
        let request: SessionRequest = serde_json::from_str(r#"{"sessionId":"abc"}"#).unwrap();
        assert_eq!(request.session_id, "abc");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_logout_response_shape() {
        let json = serde_json::to_value(LogoutResponse { logged_out: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "loggedOut": true }));
    }
}
