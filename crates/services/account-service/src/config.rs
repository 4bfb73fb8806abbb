//! Account service configuration.
//!
//! Built once at startup and passed by reference to every component; nothing
//! reads the environment after `from_env` returns.

use std::env;
use std::str::FromStr;

use common::{AppError, AppResult, DatabaseConfig, HashingConfig, JwtConfig, ServiceConfig};
use domain::{CredentialHasher, HashCost, MAX_TOKEN_EXPIRY_MINUTES, MIN_JWT_SECRET_LENGTH};

/// `DATABASE_URL` value selecting the in-memory account store
pub const MEMORY_DATABASE_URL: &str = "memory";

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";
const DEV_PASSWORD_SALT: &str = "dev-password-salt";

/// Account service configuration.
#[derive(Clone)]
pub struct AccountServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub hashing: HashingConfig,
}

impl std::fmt::Debug for AccountServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountServiceConfig")
            .field("service", &self.service)
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt.issuer)
            .field("jwt_audience", &self.jwt.audience)
            .field("password_salt", &"[REDACTED]")
            .finish()
    }
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Fails if the JWT secret is shorter than `MIN_JWT_SECRET_LENGTH`, if a
    /// secret is missing in a release build, or if the hashing settings
    /// cannot build a hasher.
    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = secret_or_dev_default(var("JWT_SECRET"), "JWT_SECRET", DEV_JWT_SECRET)?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        let salt = secret_or_dev_default(var("PASSWORD_SALT"), "PASSWORD_SALT", DEV_PASSWORD_SALT)?;

        let service_defaults = ServiceConfig::default();
        let database_defaults = DatabaseConfig::default();
        let jwt_defaults = JwtConfig::default();
        let hashing_defaults = HashingConfig::default();

        let config = Self {
            service: ServiceConfig {
                service_name: "account-service".to_string(),
                host: var("ACCOUNT_SERVICE_HOST").unwrap_or(service_defaults.host),
                port: parse_var(&var, "ACCOUNT_SERVICE_PORT").unwrap_or(service_defaults.port),
            },
            database: DatabaseConfig {
                url: var("ACCOUNT_SERVICE_DATABASE_URL")
                    .or_else(|| var("DATABASE_URL"))
                    .unwrap_or(database_defaults.url),
                max_connections: parse_var(&var, "DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(database_defaults.max_connections),
                min_connections: parse_var(&var, "DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(database_defaults.min_connections),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                issuer: var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
                audience: var("JWT_AUDIENCE").unwrap_or(jwt_defaults.audience),
                default_expiry_minutes: parse_var(&var, "JWT_EXPIRY_MINUTES")
                    .unwrap_or(jwt_defaults.default_expiry_minutes),
            },
            hashing: HashingConfig {
                salt,
                memory_kib: parse_var(&var, "PASSWORD_HASH_MEMORY_KIB").unwrap_or(hashing_defaults.memory_kib),
                iterations: parse_var(&var, "PASSWORD_HASH_ITERATIONS").unwrap_or(hashing_defaults.iterations),
                parallelism: parse_var(&var, "PASSWORD_HASH_PARALLELISM")
                    .unwrap_or(hashing_defaults.parallelism),
            },
        };

        if !(1..=MAX_TOKEN_EXPIRY_MINUTES).contains(&config.jwt.default_expiry_minutes) {
            return Err(AppError::config(format!(
                "JWT_EXPIRY_MINUTES must be between 1 and {}",
                MAX_TOKEN_EXPIRY_MINUTES
            )));
        }

        // Surface bad hashing settings at startup rather than on first request
        config.credential_hasher()?;

        Ok(config)
    }

    /// Build the credential hasher described by the hashing settings.
    pub fn credential_hasher(&self) -> AppResult<CredentialHasher> {
        let cost = HashCost {
            memory_kib: self.hashing.memory_kib,
            iterations: self.hashing.iterations,
            parallelism: self.hashing.parallelism,
        };
        Ok(CredentialHasher::new(&self.hashing.salt, cost)?)
    }

    /// Whether accounts live in process memory instead of a database.
    pub fn uses_memory_store(&self) -> bool {
        self.database.url == MEMORY_DATABASE_URL
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key).and_then(|v| v.parse().ok())
}

fn secret_or_dev_default(value: Option<String>, name: &str, dev_default: &str) -> AppResult<String> {
    match value {
        Some(value) => Ok(value),
        None if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using insecure default for development", name);
            Ok(dev_default.to_string())
        }
        None => Err(AppError::config(format!(
            "{} environment variable must be set in production",
            name
        ))),
    }
}
