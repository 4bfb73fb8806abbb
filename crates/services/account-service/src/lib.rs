//! Account Service Library
//!
//! Account registration, login, role granting, update and deletion with
//! granter checks, served over HTTP.
//!
//! # Architecture Layers
//!
//! - **api**: HTTP handlers, bearer middleware and routes
//! - **service**: account workflow and session tokens
//! - **repository**: account storage (PostgreSQL or in-memory)
//! - **infra**: database connection and migrations
//! - **cli** / **commands**: the `account-service` binary

use std::sync::Arc;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

pub use api::{create_router, AppState};
pub use config::AccountServiceConfig;

use common::AppResult;
use infra::Database;
use repository::{AccountRepository, AccountStore, InMemoryAccountStore};
use service::{AccountManager, TokenIssuer};

/// Open the account storage selected by the configuration.
///
/// A database URL connects and applies pending migrations; the `memory` URL
/// gives a fresh in-process store.
pub async fn build_repository(config: &AccountServiceConfig) -> AppResult<Arc<dyn AccountRepository>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory account storage; accounts are lost on exit");
        return Ok(Arc::new(InMemoryAccountStore::new()));
    }

    let db = Database::connect(&config.database).await?;
    Ok(Arc::new(AccountStore::new(db.get_connection())))
}

/// Wire the account service and hasher around `repo`.
pub fn build_state(repo: Arc<dyn AccountRepository>, config: &AccountServiceConfig) -> AppResult<AppState> {
    let service = AccountManager::new(repo, TokenIssuer::new(&config.jwt));
    Ok(AppState::new(Arc::new(service), config.credential_hasher()?))
}
