//! In-memory account storage, used for local runs and HTTP tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use super::account_repository::{AccountRepository, UpdateOutcome};
use common::{AppError, AppResult, OptionExt};
use domain::{Account, UpdateAccountData};

struct StorageData {
    accounts: HashMap<i64, Account>, // id -> account
    next_id: i64,
}

impl StorageData {
    fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            next_id: 1,
        }
    }

    fn login_taken(&self, login: &str, except_id: i64) -> bool {
        self.accounts
            .values()
            .any(|a| a.login == login && a.id != except_id)
    }
}

/// Account storage held in process memory.
///
/// A single lock covers every call, so the uniqueness check and the write
/// it guards are atomic.
pub struct InMemoryAccountStore {
    data: TokioMutex<StorageData>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            data: TokioMutex::new(StorageData::new()),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn add_user(&self, account: &Account) -> AppResult<i64> {
        if account.id != 0 {
            return Err(AppError::contract("new account must not carry an id"));
        }

        let mut data = self.data.lock().await;
        if data.login_taken(&account.login, 0) {
            return Err(AppError::conflict("Login"));
        }

        let id = data.next_id;
        data.next_id += 1;

        let mut stored = account.clone();
        stored.id = id;
        data.accounts.insert(id, stored);
        debug!("Stored account {} in memory", id);

        Ok(id)
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<Account>> {
        let data = self.data.lock().await;
        Ok(data.accounts.get(&id).cloned())
    }

    async fn get_user_by_login(&self, login: &str) -> AppResult<Option<Account>> {
        let data = self.data.lock().await;
        Ok(data.accounts.values().find(|a| a.login == login).cloned())
    }

    async fn update_user(&self, update: &UpdateAccountData) -> AppResult<UpdateOutcome> {
        let mut data = self.data.lock().await;

        let mut account = data.accounts.get(&update.id).cloned().ok_or_not_found()?;
        if !account.password_matches(&update.password_hash) {
            return Err(AppError::Forbidden);
        }
        if !update.apply_to(&mut account) {
            return Ok(UpdateOutcome::AlreadyActual);
        }
        if data.login_taken(&account.login, account.id) {
            return Err(AppError::conflict("Login"));
        }

        account.updated_at = Some(chrono::Utc::now());
        data.accounts.insert(account.id, account.clone());

        Ok(UpdateOutcome::Updated(account))
    }

    async fn grant_role(&self, id: i64, role: &str, granter_id: i64) -> AppResult<Account> {
        let mut data = self.data.lock().await;

        if !data.accounts.contains_key(&granter_id) {
            return Err(AppError::NotFound);
        }
        let account = data.accounts.get_mut(&id).ok_or_not_found()?;

        account.role.approve(role);
        account.granter_id = Some(granter_id);
        account.updated_at = Some(chrono::Utc::now());

        Ok(account.clone())
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        let mut data = self.data.lock().await;
        data.accounts.remove(&id).map(|_| ()).ok_or_not_found()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
