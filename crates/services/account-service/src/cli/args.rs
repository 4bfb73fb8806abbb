//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Account service - registration, login and role granting over HTTP
#[derive(Parser, Debug)]
#[command(name = "account-service")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create an administrator account
    SeedAdmin(SeedAdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to, overrides ACCOUNT_SERVICE_HOST
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on, overrides ACCOUNT_SERVICE_PORT
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed-admin command
#[derive(Parser, Debug)]
pub struct SeedAdminArgs {
    #[arg(long, env = "ADMIN_LOGIN")]
    pub login: String,

    #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
    pub name: String,

    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_admin() {
        let cli = Cli::try_parse_from([
            "account-service",
            "seed-admin",
            "--login",
            "root",
            "--email",
            "root@example.com",
            "--password",
            "secret",
        ])
        .unwrap();

        match cli.command {
            Commands::SeedAdmin(args) => {
                assert_eq!(args.login, "root");
                assert_eq!(args.name, "Administrator");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate_status_verbose() {
        let cli = Cli::try_parse_from(["account-service", "migrate", "status", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }
}
