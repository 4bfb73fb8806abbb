//! Command objects handed from the API layer to the account service.
//!
//! Passwords are already hashed here; an empty hash means the password and
//! its confirmation did not match or were blank.

use crate::account::{Account, RoleState};
use crate::error::{DomainError, DomainResult};

pub(crate) fn require(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Login request.
#[derive(Debug, Clone)]
pub struct LoginData {
    pub login: String,
    pub password_hash: String,
    /// Token lifetime; the default applies when absent
    pub timeout_minutes: Option<i64>,
}

impl LoginData {
    pub fn validate(&self) -> DomainResult<()> {
        require(&self.login, "Login")?;
        require(&self.password_hash, "Password")
    }
}

/// Role grant performed by `granter_id` on account `id`.
#[derive(Debug, Clone)]
pub struct GrantRoleData {
    pub id: i64,
    pub login: String,
    pub granter_id: i64,
    pub granter_login: String,
    pub granter_password_hash: String,
    pub role: String,
}

impl GrantRoleData {
    pub fn validate(&self) -> DomainResult<()> {
        require(&self.login, "Login")?;
        require(&self.granter_password_hash, "Granter password")?;
        require(&self.granter_login, "Granter login")
    }
}

/// Owner-authenticated account update.
#[derive(Debug, Clone)]
pub struct UpdateAccountData {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    /// Hash of the current password, checked against storage
    pub password_hash: String,
    /// Replacement password hash, if the password changes
    pub new_password_hash: Option<String>,
    pub nick: Option<String>,
    pub phone: Option<String>,
    pub requested_role: Option<String>,
}

impl UpdateAccountData {
    pub fn validate(&self) -> DomainResult<()> {
        require(&self.login, "Login")?;
        require(&self.name, "User name")?;
        require(&self.email, "Email")?;
        require(&self.password_hash, "Password")
    }

    /// Copy the editable fields onto `account`, reporting whether anything
    /// changed.
    ///
    /// Optional fields are replaced as given, so `None` clears them. The
    /// password hash only changes when a new one is supplied, and the
    /// requested role never touches the approved one.
    pub fn apply_to(&self, account: &mut Account) -> bool {
        let mut changed = false;

        changed |= replace(&mut account.login, &self.login);
        changed |= replace(&mut account.name, &self.name);
        changed |= replace(&mut account.email, &self.email);
        if let Some(new_hash) = &self.new_password_hash {
            changed |= replace(&mut account.password_hash, new_hash);
        }
        changed |= replace(&mut account.nick, &self.nick);
        changed |= replace(&mut account.phone, &self.phone);

        let requested = RoleState::requested(self.requested_role.clone()).requested;
        changed |= replace(&mut account.role.requested, &requested);

        changed
    }
}

fn replace<T: PartialEq + Clone>(current: &mut T, incoming: &T) -> bool {
    if current == incoming {
        return false;
    }
    *current = incoming.clone();
    true
}

/// Account deletion, either by the owner or on behalf of a granter.
#[derive(Debug, Clone)]
pub struct DeleteAccountData {
    pub id: i64,
    pub login: String,
    /// Owner's password hash, or the granter's when a granter is given
    pub password_hash: String,
    pub granter_id: Option<i64>,
    pub granter_login: Option<String>,
}

impl DeleteAccountData {
    pub fn validate(&self) -> DomainResult<()> {
        require(&self.login, "Login")?;
        require(&self.password_hash, "Password")?;
        self.granter().map(|_| ())
    }

    /// Granter id and login, which must be supplied together.
    pub fn granter(&self) -> DomainResult<Option<(i64, &str)>> {
        let login = self
            .granter_login
            .as_deref()
            .filter(|l| !l.trim().is_empty());

        match (self.granter_id, login) {
            (Some(id), Some(login)) => Ok(Some((id, login))),
            (None, None) => Ok(None),
            _ => Err(DomainError::validation(
                "Granter id and granter login must be supplied together",
            )),
        }
    }
}
