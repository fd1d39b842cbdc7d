//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::account::AccountService;
use crate::infrastructure::auth::AuthorizationGate;

use super::cookies::SessionCookies;

/// Shared services handed to every handler and middleware
#[derive(Clone, Debug)]
pub struct AppState {
    pub accounts: AccountService,
    pub gate: AuthorizationGate,
    pub cookies: Arc<SessionCookies>,
}

impl AppState {
    pub fn new(accounts: AccountService, cookies: SessionCookies) -> Self {
        let gate = AuthorizationGate::new(accounts.sessions().clone());

        Self {
            accounts,
            gate,
            cookies: Arc::new(cookies),
        }
    }
}
