//! Account lifecycle and role granting.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::token::{Claims, TokenIssuer};
use crate::repository::{AccountRepository, UpdateOutcome};
use common::{AppError, AppResult, OptionExt};
use domain::{
    Account, AccountInfo, DeleteAccountData, GrantRoleData, LoginData, UpdateAccountData,
    MSG_ALREADY_ACTUAL, MSG_ALREADY_REGISTERED, MSG_CREATED, MSG_DELETED, MSG_LOGGED_IN,
    MSG_ROLE_GRANTED, MSG_UPDATED, ROLE_ADMIN,
};

/// Result of a successful account operation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountOutcome {
    /// Id of the account the operation applied to
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Account created")]
    pub message: String,
    /// Session token, only present after login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AccountOutcome {
    fn new(id: i64, message: &str) -> Self {
        Self {
            id,
            message: message.to_string(),
            token: None,
        }
    }
}

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account; identical re-registration returns the existing id
    async fn register(&self, account: Account) -> AppResult<AccountOutcome>;

    /// Check credentials and issue a session token
    async fn login(&self, data: LoginData) -> AppResult<AccountOutcome>;

    /// Approve a role for an account on a granter's credentials
    async fn grant_role(&self, data: GrantRoleData) -> AppResult<AccountOutcome>;

    /// Owner-authenticated update of account fields
    async fn update_account(&self, data: UpdateAccountData) -> AppResult<AccountOutcome>;

    /// Delete an account with the owner's or a granter's credentials
    async fn delete_account(&self, data: DeleteAccountData) -> AppResult<AccountOutcome>;

    async fn get_user_info_by_id(&self, id: i64) -> AppResult<Option<AccountInfo>>;

    async fn get_user_info_by_login(&self, login: &str) -> AppResult<Option<AccountInfo>>;

    /// Register an account and make it its own admin granter
    async fn seed_admin(&self, account: Account) -> AppResult<AccountOutcome>;

    /// Verify a bearer token
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Check that account storage is reachable
    async fn health_check(&self) -> AppResult<()>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
    tokens: TokenIssuer,
}

impl AccountManager {
    pub fn new(repo: Arc<dyn AccountRepository>, tokens: TokenIssuer) -> Self {
        Self { repo, tokens }
    }

    /// Load `id` and check it is really `login`.
    async fn load_matching(&self, id: i64, login: &str) -> AppResult<Account> {
        let account = self.repo.get_user(id).await?.ok_or_not_found()?;
        if account.login != login {
            tracing::warn!("Login does not match account {}", id);
            return Err(AppError::Forbidden);
        }
        Ok(account)
    }

    /// Load granter `id` and check its login and password hash.
    async fn load_granter(&self, id: i64, login: &str, password_hash: &str) -> AppResult<Account> {
        let granter = self.load_matching(id, login).await?;
        if !granter.password_matches(password_hash) {
            tracing::warn!("Granter {} presented a wrong password", id);
            return Err(AppError::Forbidden);
        }
        Ok(granter)
    }

    /// Outcome of registering `incoming` when `existing` already holds its login.
    fn registered_already(existing: &Account, incoming: &Account) -> AppResult<AccountOutcome> {
        if existing.same_registration(incoming) {
            return Ok(AccountOutcome::new(existing.id, MSG_ALREADY_REGISTERED));
        }
        Err(AppError::conflict("Login"))
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, mut account: Account) -> AppResult<AccountOutcome> {
        account.validate_registration()?;

        // Self-registration can only ask for a role, never hold one
        account.role.approved = None;
        account.granter_id = None;

        if let Some(existing) = self.repo.get_user_by_login(&account.login).await? {
            return Self::registered_already(&existing, &account);
        }

        match self.repo.add_user(&account).await {
            Ok(id) => {
                tracing::info!("Registered account {} ({})", id, account.login);
                Ok(AccountOutcome::new(id, MSG_CREATED))
            }
            // Another registration took the login between lookup and insert
            Err(AppError::Conflict(resource)) => {
                let existing = self
                    .repo
                    .get_user_by_login(&account.login)
                    .await?
                    .ok_or(AppError::Conflict(resource))?;
                Self::registered_already(&existing, &account)
            }
            Err(err) => Err(err),
        }
    }

    async fn login(&self, data: LoginData) -> AppResult<AccountOutcome> {
        data.validate()?;

        let account = self
            .repo
            .get_user_by_login(&data.login)
            .await?
            .ok_or_not_found()?;

        if !account.password_matches(&data.password_hash) {
            tracing::warn!("Failed login for account {}", account.id);
            return Err(AppError::Unauthorized);
        }

        let issued = self
            .tokens
            .issue(account.role.approved.as_deref(), data.timeout_minutes)?;
        tracing::info!("Account {} logged in", account.id);

        Ok(AccountOutcome {
            id: account.id,
            message: MSG_LOGGED_IN.to_string(),
            token: Some(issued.token),
        })
    }

    async fn grant_role(&self, data: GrantRoleData) -> AppResult<AccountOutcome> {
        data.validate()?;

        self.load_matching(data.id, &data.login).await?;
        self.load_granter(data.granter_id, &data.granter_login, &data.granter_password_hash)
            .await?;

        let account = self
            .repo
            .grant_role(data.id, &data.role, data.granter_id)
            .await?;
        tracing::info!(
            "Account {} granted role {:?} to account {}",
            data.granter_id,
            account.role.approved,
            account.id
        );

        Ok(AccountOutcome::new(account.id, MSG_ROLE_GRANTED))
    }

    async fn update_account(&self, data: UpdateAccountData) -> AppResult<AccountOutcome> {
        data.validate()?;

        match self.repo.update_user(&data).await? {
            UpdateOutcome::Updated(account) => {
                tracing::info!("Updated account {}", account.id);
                Ok(AccountOutcome::new(account.id, MSG_UPDATED))
            }
            UpdateOutcome::AlreadyActual => Ok(AccountOutcome::new(data.id, MSG_ALREADY_ACTUAL)),
        }
    }

    async fn delete_account(&self, data: DeleteAccountData) -> AppResult<AccountOutcome> {
        data.validate()?;

        let target = self.load_matching(data.id, &data.login).await?;

        match data.granter()? {
            Some((granter_id, granter_login)) => {
                let granter = self
                    .load_granter(granter_id, granter_login, &data.password_hash)
                    .await?;
                // Only an administrator or whoever granted the target's role may delete it
                if !granter.role.is_admin() && target.granter_id != Some(granter.id) {
                    tracing::warn!(
                        "Account {} is not allowed to delete account {}",
                        granter.id,
                        target.id
                    );
                    return Err(AppError::Forbidden);
                }
            }
            None => {
                if !target.password_matches(&data.password_hash) {
                    tracing::warn!("Self-delete of account {} with a wrong password", target.id);
                    return Err(AppError::Forbidden);
                }
            }
        }

        self.repo.delete_user(target.id).await?;
        tracing::info!("Deleted account {}", target.id);

        Ok(AccountOutcome::new(target.id, MSG_DELETED))
    }

    async fn get_user_info_by_id(&self, id: i64) -> AppResult<Option<AccountInfo>> {
        Ok(self.repo.get_user(id).await?.map(AccountInfo::from))
    }

    async fn get_user_info_by_login(&self, login: &str) -> AppResult<Option<AccountInfo>> {
        if login.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.repo.get_user_by_login(login).await?.map(AccountInfo::from))
    }

    async fn seed_admin(&self, account: Account) -> AppResult<AccountOutcome> {
        let registered = self.register(account).await?;
        self.repo
            .grant_role(registered.id, ROLE_ADMIN, registered.id)
            .await?;
        tracing::info!("Account {} is now an administrator", registered.id);

        Ok(AccountOutcome::new(registered.id, MSG_ROLE_GRANTED))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }

    async fn health_check(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::JwtConfig;
    use domain::RoleState;
    use mockall::predicate::eq;
    use tokio_test::assert_ok;

    use super::*;
    use crate::repository::MockAccountRepository;

    const BOB: i64 = 2;
    const ADMIN: i64 = 1;
    const CAROL: i64 = 3;

    fn account(id: i64, login: &str, password_hash: &str) -> Account {
        Account {
            id,
            login: login.to_string(),
            name: "Test User".to_string(),
            email: format!("{}@example.com", login),
            password_hash: password_hash.to_string(),
            nick: None,
            phone: None,
            role: RoleState::default(),
            granter_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn bob() -> Account {
        account(BOB, "bob", "bob-hash")
    }

    fn admin() -> Account {
        let mut admin = account(ADMIN, "admin", "admin-hash");
        admin.role.approve(ROLE_ADMIN);
        admin
    }

    fn service(repo: MockAccountRepository) -> AccountManager {
        let tokens = TokenIssuer::new(&JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            ..JwtConfig::default()
        });
        AccountManager::new(Arc::new(repo), tokens)
    }

    fn carol() -> Account {
        account(CAROL, "carol", "carol-hash")
    }

    /// Repository that knows bob, admin and carol by id.
    fn repo_with_accounts() -> MockAccountRepository {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user().returning(|id| {
            Ok(match id {
                BOB => Some(bob()),
                ADMIN => Some(admin()),
                CAROL => Some(carol()),
                _ => None,
            })
        });
        repo
    }

    fn grant(login: &str, granter_login: &str, granter_hash: &str) -> GrantRoleData {
        GrantRoleData {
            id: BOB,
            login: login.to_string(),
            granter_id: ADMIN,
            granter_login: granter_login.to_string(),
            granter_password_hash: granter_hash.to_string(),
            role: "editor".to_string(),
        }
    }

    fn delete(password_hash: &str, granter: Option<(i64, &str)>) -> DeleteAccountData {
        DeleteAccountData {
            id: BOB,
            login: "bob".to_string(),
            password_hash: password_hash.to_string(),
            granter_id: granter.map(|(id, _)| id),
            granter_login: granter.map(|(_, login)| login.to_string()),
        }
    }

    // =========================================================================
    // Register
    // =========================================================================

    #[tokio::test]
    async fn test_register_creates_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(None));
        repo.expect_add_user()
            .withf(|a| a.id == 0 && a.role.requested.as_deref() == Some("editor"))
            .times(1)
            .returning(|_| Ok(7));

        let mut incoming = account(0, "bob", "bob-hash");
        incoming.role = RoleState::requested(Some("editor".to_string()));

        let outcome = service(repo).register(incoming).await.unwrap();
        assert_eq!(outcome.id, 7);
        assert_eq!(outcome.message, MSG_CREATED);
        assert!(outcome.token.is_none());
    }

    #[tokio::test]
    async fn test_register_identical_data_is_idempotent() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(Some(bob())));
        repo.expect_add_user().never();

        let service = service(repo);
        let first = service.register(account(0, "bob", "bob-hash")).await.unwrap();
        let second = service.register(account(0, "bob", "bob-hash")).await.unwrap();

        assert_eq!(first.id, BOB);
        assert_eq!(second.id, BOB);
    }

    #[tokio::test]
    async fn test_register_existing_login_with_other_data_conflicts() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(Some(bob())));
        repo.expect_add_user().never();

        let result = service(repo).register(account(0, "bob", "other-hash")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_losing_insert_race_with_identical_data() {
        let mut lookups = 0;
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().times(2).returning(move |_| {
            lookups += 1;
            Ok(if lookups == 1 { None } else { Some(bob()) })
        });
        repo.expect_add_user()
            .times(1)
            .returning(|_| Err(AppError::conflict("Login")));

        let outcome = service(repo)
            .register(account(0, "bob", "bob-hash"))
            .await
            .unwrap();
        assert_eq!(outcome.id, BOB);
        assert_eq!(outcome.message, MSG_ALREADY_REGISTERED);
    }

    #[tokio::test]
    async fn test_register_losing_insert_race_with_other_data_conflicts() {
        let mut lookups = 0;
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().times(2).returning(move |_| {
            lookups += 1;
            Ok(if lookups == 1 { None } else { Some(bob()) })
        });
        repo.expect_add_user()
            .returning(|_| Err(AppError::conflict("Login")));

        let result = service(repo).register(account(0, "bob", "other-hash")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields_and_ids() {
        let service = service(MockAccountRepository::new());

        let mut blank_email = account(0, "bob", "bob-hash");
        blank_email.email = "  ".to_string();
        assert!(matches!(
            service.register(blank_email).await,
            Err(AppError::BadRequest(_))
        ));

        // A password/confirmation mismatch arrives as an empty hash
        assert!(matches!(
            service.register(account(0, "bob", "")).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(matches!(
            service.register(account(5, "bob", "bob-hash")).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_register_cannot_self_approve_role() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(None));
        repo.expect_add_user()
            .withf(|a| a.role.approved.is_none() && a.granter_id.is_none())
            .returning(|_| Ok(3));

        let mut incoming = account(0, "mallory", "hash");
        incoming.role.approved = Some(ROLE_ADMIN.to_string());
        incoming.granter_id = Some(3);

        assert_ok!(service(repo).register(incoming).await);
    }

    // =========================================================================
    // Login
    // =========================================================================

    #[tokio::test]
    async fn test_login_issues_token_with_approved_role() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(Some(admin())));

        let service = service(repo);
        let outcome = service
            .login(LoginData {
                login: "admin".to_string(),
                password_hash: "admin-hash".to_string(),
                timeout_minutes: Some(5),
            })
            .await
            .unwrap();

        assert_eq!(outcome.id, ADMIN);
        let claims = service.verify_token(&outcome.token.unwrap()).unwrap();
        assert_eq!(claims.role.as_deref(), Some(ROLE_ADMIN));
        assert!((claims.exp - (Utc::now().timestamp() + 5 * 60)).abs() <= 2);
    }

    #[tokio::test]
    async fn test_login_requested_role_is_not_in_token() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| {
            let mut account = bob();
            account.role = RoleState::requested(Some(ROLE_ADMIN.to_string()));
            Ok(Some(account))
        });

        let service = service(repo);
        let outcome = service
            .login(LoginData {
                login: "bob".to_string(),
                password_hash: "bob-hash".to_string(),
                timeout_minutes: None,
            })
            .await
            .unwrap();

        let claims = service.verify_token(&outcome.token.unwrap()).unwrap();
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(Some(bob())));

        let result = service(repo)
            .login(LoginData {
                login: "bob".to_string(),
                password_hash: "wrong".to_string(),
                timeout_minutes: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_unknown_account_is_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(None));

        let result = service(repo)
            .login(LoginData {
                login: "ghost".to_string(),
                password_hash: "hash".to_string(),
                timeout_minutes: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    // =========================================================================
    // Grant role
    // =========================================================================

    #[tokio::test]
    async fn test_grant_role_with_verified_granter() {
        let mut repo = repo_with_accounts();
        repo.expect_grant_role()
            .withf(|id, role, granter_id| *id == BOB && role == "editor" && *granter_id == ADMIN)
            .times(1)
            .returning(|_, role, granter_id| {
                let mut account = bob();
                account.role.approve(role);
                account.granter_id = Some(granter_id);
                Ok(account)
            });

        let outcome = service(repo)
            .grant_role(grant("bob", "admin", "admin-hash"))
            .await
            .unwrap();
        assert_eq!(outcome.id, BOB);
        assert_eq!(outcome.message, MSG_ROLE_GRANTED);
    }

    #[tokio::test]
    async fn test_grant_role_rejects_target_login_mismatch() {
        let mut repo = repo_with_accounts();
        repo.expect_grant_role().never();

        let result = service(repo)
            .grant_role(grant("alice", "admin", "admin-hash"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_grant_role_rejects_granter_login_mismatch() {
        let mut repo = repo_with_accounts();
        repo.expect_grant_role().never();

        let result = service(repo)
            .grant_role(grant("bob", "root", "admin-hash"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_grant_role_rejects_granter_password_mismatch() {
        let mut repo = repo_with_accounts();
        repo.expect_grant_role().never();

        // Target's own password does not authorize a grant
        let result = service(repo)
            .grant_role(grant("bob", "admin", "bob-hash"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_grant_role_missing_accounts_not_found() {
        let mut repo = repo_with_accounts();
        repo.expect_grant_role().never();
        let service = service(repo);

        let mut missing_target = grant("bob", "admin", "admin-hash");
        missing_target.id = 99;
        assert!(matches!(
            service.grant_role(missing_target).await,
            Err(AppError::NotFound)
        ));

        let mut missing_granter = grant("bob", "admin", "admin-hash");
        missing_granter.granter_id = 99;
        assert!(matches!(
            service.grant_role(missing_granter).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_grant_role_requires_granter_login() {
        let result = service(MockAccountRepository::new())
            .grant_role(grant("bob", "", "admin-hash"))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    // =========================================================================
    // Update
    // =========================================================================

    fn update(password_hash: &str) -> UpdateAccountData {
        let bob = bob();
        UpdateAccountData {
            id: bob.id,
            login: bob.login,
            name: bob.name,
            email: bob.email,
            password_hash: password_hash.to_string(),
            new_password_hash: None,
            nick: None,
            phone: None,
            requested_role: None,
        }
    }

    #[tokio::test]
    async fn test_update_already_actual() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update_user()
            .returning(|_| Ok(UpdateOutcome::AlreadyActual));

        let outcome = service(repo).update_account(update("bob-hash")).await.unwrap();
        assert_eq!(outcome.id, BOB);
        assert_eq!(outcome.message, MSG_ALREADY_ACTUAL);
    }

    #[tokio::test]
    async fn test_update_passes_repository_errors_through() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update_user().returning(|_| Err(AppError::Forbidden));

        let result = service(repo).update_account(update("wrong")).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_blank_password_never_reaches_storage() {
        let mut repo = MockAccountRepository::new();
        repo.expect_update_user().never();

        let result = service(repo).update_account(update("")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[tokio::test]
    async fn test_self_delete_with_own_password() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().with(eq(BOB)).times(1).returning(|_| Ok(()));

        let outcome = service(repo).delete_account(delete("bob-hash", None)).await.unwrap();
        assert_eq!(outcome.message, MSG_DELETED);
    }

    #[tokio::test]
    async fn test_self_delete_with_other_password_forbidden() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().never();

        let result = service(repo).delete_account(delete("admin-hash", None)).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_by_granter() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().with(eq(BOB)).times(1).returning(|_| Ok(()));

        let result = service(repo)
            .delete_account(delete("admin-hash", Some((ADMIN, "admin"))))
            .await;
        assert_ok!(result);
    }

    #[tokio::test]
    async fn test_delete_by_granter_with_wrong_password_forbidden() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().never();

        let result = service(repo)
            .delete_account(delete("bob-hash", Some((ADMIN, "admin"))))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_by_unrelated_account_forbidden() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().never();

        // Valid credentials, but carol is not an admin and did not grant bob a role
        let result = service(repo)
            .delete_account(delete("carol-hash", Some((CAROL, "carol"))))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_by_recorded_granter() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user().returning(|id| {
            Ok(match id {
                BOB => {
                    let mut bob = bob();
                    bob.role.approve("editor");
                    bob.granter_id = Some(CAROL);
                    Some(bob)
                }
                CAROL => Some(carol()),
                _ => None,
            })
        });
        repo.expect_delete_user().with(eq(BOB)).times(1).returning(|_| Ok(()));

        let result = service(repo)
            .delete_account(delete("carol-hash", Some((CAROL, "carol"))))
            .await;
        assert_ok!(result);
    }

    #[tokio::test]
    async fn test_delete_granter_id_and_login_go_together() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user().never();
        repo.expect_delete_user().never();
        let service = service(repo);

        let mut only_id = delete("admin-hash", None);
        only_id.granter_id = Some(ADMIN);
        assert!(matches!(
            service.delete_account(only_id).await,
            Err(AppError::BadRequest(_))
        ));

        let mut only_login = delete("admin-hash", None);
        only_login.granter_login = Some("admin".to_string());
        assert!(matches!(
            service.delete_account(only_login).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_target_login_mismatch_forbidden() {
        let mut repo = repo_with_accounts();
        repo.expect_delete_user().never();

        let mut data = delete("bob-hash", None);
        data.login = "alice".to_string();
        assert!(matches!(
            service(repo).delete_account(data).await,
            Err(AppError::Forbidden)
        ));
    }

    // =========================================================================
    // Lookups and seeding
    // =========================================================================

    #[tokio::test]
    async fn test_get_user_info_blank_login_skips_storage() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().never();

        let info = service(repo).get_user_info_by_login(" ").await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_get_user_info_by_id() {
        let repo = repo_with_accounts();
        let service = service(repo);

        let info = service.get_user_info_by_id(ADMIN).await.unwrap().unwrap();
        assert_eq!(info.login, "admin");
        assert_eq!(info.role.as_deref(), Some(ROLE_ADMIN));
        assert!(service.get_user_info_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_admin_grants_itself() {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(None));
        repo.expect_add_user().returning(|_| Ok(ADMIN));
        repo.expect_grant_role()
            .withf(|id, role, granter_id| *id == ADMIN && role == ROLE_ADMIN && *granter_id == ADMIN)
            .times(1)
            .returning(|_, _, _| Ok(admin()));

        let outcome = service(repo)
            .seed_admin(account(0, "admin", "admin-hash"))
            .await
            .unwrap();
        assert_eq!(outcome.id, ADMIN);
    }
}
