//! Repository layer for data access.

mod account_repository;
pub mod entities;
mod memory;

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountStore, UpdateOutcome};
pub use memory::InMemoryAccountStore;
