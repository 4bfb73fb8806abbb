//! Application state shared by every handler.

use std::sync::Arc;

use domain::CredentialHasher;

use crate::service::AccountService;

/// Application state (DI container).
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountService>,
    /// Turns request passwords into stored hashes before they reach the service
    pub hasher: Arc<CredentialHasher>,
}

impl AppState {
    pub fn new(accounts: Arc<dyn AccountService>, hasher: CredentialHasher) -> Self {
        Self {
            accounts,
            hasher: Arc::new(hasher),
        }
    }
}
