//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod cookies;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use cookies::SessionCookies;
pub use router::{create_router, create_router_with_cors};
pub use state::AppState;
