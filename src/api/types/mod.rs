//! API request, response and error types

pub mod error;
pub mod json;
pub mod request;

pub use error::{ApiError, ApiErrorResponse, FieldError};
pub use json::{Json, ValidatedJson};
pub use request::{
    AccountResponse, CredentialsRequest, LogoutResponse, RegisterResponse, SessionRequest,
    SigninResponse,
};
