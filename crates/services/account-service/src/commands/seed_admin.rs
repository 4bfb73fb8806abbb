//! Seed-admin command - Bootstraps the first administrator.
//!
//! Role grants need an existing admin, so the first one is created here.

use chrono::Utc;

use crate::cli::args::SeedAdminArgs;
use crate::config::AccountServiceConfig;
use crate::{build_repository, build_state};
use common::AppResult;
use domain::{Account, RoleState};

/// Execute the seed-admin command
pub async fn execute(args: SeedAdminArgs, config: AccountServiceConfig) -> AppResult<()> {
    if config.uses_memory_store() {
        tracing::warn!("Seeding the in-memory store; the account is lost on exit");
    }

    let state = build_state(build_repository(&config).await?, &config)?;

    let account = Account {
        id: 0,
        login: args.login,
        name: args.name,
        email: args.email,
        password_hash: state.hasher.hash_single(&args.password)?.unwrap_or_default(),
        nick: None,
        phone: None,
        role: RoleState::default(),
        granter_id: None,
        created_at: Utc::now(),
        updated_at: None,
    };

    let outcome = state.accounts.seed_admin(account).await?;
    println!("Administrator account id: {}", outcome.id);

    Ok(())
}
