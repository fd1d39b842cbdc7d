//! API middleware components

pub mod logging;
pub mod security;
pub mod session_auth;

pub use logging::logging_middleware;
pub use security::{body_limit_middleware, security_headers_middleware};
pub use session_auth::{require_session, CurrentAccount, RequireAccount};
