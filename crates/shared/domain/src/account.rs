//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::require;
use crate::constants::ROLE_ADMIN;
use crate::error::{DomainError, DomainResult};

/// Role approval state of an account.
///
/// `requested` is what the account asked for itself and carries no authority.
/// `approved` is set only by a granter and is what tokens carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleState {
    pub requested: Option<String>,
    pub approved: Option<String>,
}

impl RoleState {
    /// Self-requested role, nothing approved yet.
    pub fn requested(role: Option<String>) -> Self {
        Self {
            requested: normalize_role(role),
            approved: None,
        }
    }

    /// Record a new self-request, keeping whatever was approved.
    pub fn request(&mut self, role: Option<String>) {
        self.requested = normalize_role(role);
    }

    /// Approve `role`, dropping any pending request. A blank role revokes.
    pub fn approve(&mut self, role: &str) {
        self.approved = normalize_role(Some(role.to_string()));
        self.requested = None;
    }

    /// Check if the approved role is admin
    pub fn is_admin(&self) -> bool {
        self.approved.as_deref() == Some(ROLE_ADMIN)
    }
}

fn normalize_role(role: Option<String>) -> Option<String> {
    role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Storage-assigned id, zero until persisted
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub nick: Option<String>,
    pub phone: Option<String>,
    pub role: RoleState,
    /// Account that last set `role.approved`
    pub granter_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check the fields a registration must carry.
    pub fn validate_registration(&self) -> DomainResult<()> {
        require(&self.login, "Login")?;
        require(&self.name, "User name")?;
        require(&self.email, "Email")?;
        require(&self.password_hash, "Password")?;
        if self.id != 0 {
            return Err(DomainError::validation("A new account must not have an id"));
        }
        Ok(())
    }

    /// Check whether the stored hash equals a presented one
    pub fn password_matches(&self, password_hash: &str) -> bool {
        self.password_hash == password_hash
    }

    /// Field equality used for idempotent registration.
    ///
    /// Ignores id, timestamps, approved role and granter.
    pub fn same_registration(&self, other: &Account) -> bool {
        self.login == other.login
            && self.name == other.name
            && self.email == other.email
            && self.password_hash == other.password_hash
            && self.nick == other.nick
            && self.phone == other.phone
            && self.role.requested == other.role.requested
    }
}

/// Account view safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: i64,
    pub login: String,
    pub user_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role approved by a granter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Role asked for by the account itself, pending approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granter_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            login: account.login,
            user_name: account.name,
            email: account.email,
            nick: account.nick,
            phone: account.phone,
            role: account.role.approved,
            requested_role: account.role.requested,
            granter_id: account.granter_id,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: 7,
            login: "bob".to_string(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: "hash".to_string(),
            nick: None,
            phone: Some("555".to_string()),
            role: RoleState::requested(Some("editor".to_string())),
            granter_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_requested_role_is_not_authoritative() {
        let role = RoleState::requested(Some("admin".to_string()));
        assert_eq!(role.requested.as_deref(), Some("admin"));
        assert_eq!(role.approved, None);
        assert!(!role.is_admin());
    }

    #[test]
    fn test_blank_requested_role_is_none() {
        assert_eq!(RoleState::requested(Some("  ".to_string())).requested, None);
    }

    #[test]
    fn test_approve_clears_request() {
        let mut role = RoleState::requested(Some("editor".to_string()));
        role.approve("editor");
        assert_eq!(role.approved.as_deref(), Some("editor"));
        assert_eq!(role.requested, None);

        role.request(Some("admin".to_string()));
        assert_eq!(role.approved.as_deref(), Some("editor"));
        assert_eq!(role.requested.as_deref(), Some("admin"));

        role.approve("");
        assert_eq!(role.approved, None);
    }

    #[test]
    fn test_same_registration_ignores_id_and_timestamps() {
        let stored = account();
        let mut incoming = account();
        incoming.id = 0;
        incoming.created_at = Utc::now() + chrono::Duration::days(1);
        incoming.updated_at = Some(Utc::now());

        assert!(stored.same_registration(&incoming));

        incoming.email = "other@example.com".to_string();
        assert!(!stored.same_registration(&incoming));
    }

    #[test]
    fn test_registration_requires_zero_id_and_password() {
        let mut incoming = account();
        assert_eq!(
            incoming.validate_registration(),
            Err(DomainError::validation("A new account must not have an id"))
        );

        incoming.id = 0;
        assert!(incoming.validate_registration().is_ok());

        incoming.password_hash = String::new();
        assert_eq!(
            incoming.validate_registration(),
            Err(DomainError::validation("Password is required"))
        );
    }

    #[test]
    fn test_account_info_hides_password_hash() {
        let json = serde_json::to_value(AccountInfo::from(account())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["userName"], "Bob");
        assert_eq!(json["requestedRole"], "editor");
        assert!(json.get("role").is_none());
    }
}
