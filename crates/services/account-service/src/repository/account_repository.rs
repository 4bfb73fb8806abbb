//! Account repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{Account, UpdateAccountData};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of a field-diff update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// At least one field changed and was written
    Updated(Account),
    /// Stored data already equals the request; nothing was written
    AlreadyActual,
}

/// Account repository trait for dependency injection.
///
/// Every method is a single storage round trip from the caller's view.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return the id storage assigned to it.
    ///
    /// `account.id` must be zero. Fails with `Conflict` if the login is taken.
    async fn add_user(&self, account: &Account) -> AppResult<i64>;

    /// Find account by id
    async fn get_user(&self, id: i64) -> AppResult<Option<Account>>;

    /// Find account by login
    async fn get_user_by_login(&self, login: &str) -> AppResult<Option<Account>>;

    /// Write the fields of `data` that differ from storage.
    ///
    /// `Forbidden` if `data.password_hash` is not the stored hash.
    async fn update_user(&self, data: &UpdateAccountData) -> AppResult<UpdateOutcome>;

    /// Approve `role` for account `id` on behalf of `granter_id`
    async fn grant_role(&self, id: i64, role: &str, granter_id: i64) -> AppResult<Account>;

    /// Remove an account permanently
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    /// Check that storage is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i64) -> AppResult<Option<account::Model>> {
        Ok(AccountEntity::find_by_id(id).one(&self.db).await?)
    }
}

/// Map a unique-index violation on `login` to `Conflict`.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Login"),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn add_user(&self, account: &Account) -> AppResult<i64> {
        if account.id != 0 {
            return Err(AppError::contract("new account must not carry an id"));
        }

        let active_model = ActiveModel {
            id: NotSet,
            login: Set(account.login.clone()),
            name: Set(account.name.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            nick: Set(account.nick.clone()),
            phone: Set(account.phone.clone()),
            role: Set(account.role.approved.clone()),
            requested_role: Set(account.role.requested.clone()),
            granter_id: Set(account.granter_id),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(model.id)
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<Account>> {
        Ok(self.find_model(id).await?.map(Account::from))
    }

    async fn get_user_by_login(&self, login: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Login.eq(login))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn update_user(&self, data: &UpdateAccountData) -> AppResult<UpdateOutcome> {
        let model = self.find_model(data.id).await?.ok_or_not_found()?;
        let mut updated = Account::from(model.clone());

        if !updated.password_matches(&data.password_hash) {
            return Err(AppError::Forbidden);
        }
        if !data.apply_to(&mut updated) {
            return Ok(UpdateOutcome::AlreadyActual);
        }

        // Only columns that actually changed are marked Set
        let mut active: ActiveModel = model.clone().into();
        if updated.login != model.login {
            active.login = Set(updated.login.clone());
        }
        if updated.name != model.name {
            active.name = Set(updated.name.clone());
        }
        if updated.email != model.email {
            active.email = Set(updated.email.clone());
        }
        if updated.password_hash != model.password_hash {
            active.password_hash = Set(updated.password_hash.clone());
        }
        if updated.nick != model.nick {
            active.nick = Set(updated.nick.clone());
        }
        if updated.phone != model.phone {
            active.phone = Set(updated.phone.clone());
        }
        if updated.role.requested != model.requested_role {
            active.requested_role = Set(updated.role.requested.clone());
        }
        active.updated_at = Set(Some(chrono::Utc::now()));

        let model = active.update(&self.db).await.map_err(map_write_err)?;
        Ok(UpdateOutcome::Updated(Account::from(model)))
    }

    async fn grant_role(&self, id: i64, role: &str, granter_id: i64) -> AppResult<Account> {
        self.find_model(granter_id).await?.ok_or_not_found()?;
        let model = self.find_model(id).await?.ok_or_not_found()?;

        let mut role_state = Account::from(model.clone()).role;
        role_state.approve(role);

        let mut active: ActiveModel = model.into();
        active.role = Set(role_state.approved);
        active.requested_role = Set(role_state.requested);
        active.granter_id = Set(Some(granter_id));
        active.updated_at = Set(Some(chrono::Utc::now()));

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        let result = AccountEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await.map_err(AppError::from)
    }
}
