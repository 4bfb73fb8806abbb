//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod commands;
pub mod constants;
pub mod error;
pub mod password;

pub use account::{Account, AccountInfo, RoleState};
pub use commands::{DeleteAccountData, GrantRoleData, LoginData, UpdateAccountData};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{CredentialHasher, HashCost};
