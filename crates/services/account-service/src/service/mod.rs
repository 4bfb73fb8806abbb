//! Business logic layer.

mod account_service;
mod token;

pub use account_service::{AccountManager, AccountOutcome, AccountService};
pub use token::{Claims, IssuedToken, TokenIssuer};
