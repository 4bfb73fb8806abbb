//! Credential hasher - one-way password digests.
//!
//! Stored hashes are compared by value, so the digest must be deterministic:
//! Argon2id runs with a process-wide salt taken from configuration instead of
//! a random per-password salt.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{
    DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM,
    MAX_PASSWORD_SALT_LENGTH, MIN_PASSWORD_SALT_LENGTH,
};
use crate::error::{DomainError, DomainResult};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Deterministic password hasher.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    salt: SaltString,
}

// Don't expose the salt in debug output
impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl CredentialHasher {
    /// Build a hasher from the configured salt and cost.
    ///
    /// # Errors
    /// Returns a configuration error if the salt is outside
    /// `MIN_PASSWORD_SALT_LENGTH..=MAX_PASSWORD_SALT_LENGTH` bytes or the
    /// cost parameters are rejected by Argon2.
    pub fn new(salt: &str, cost: HashCost) -> DomainResult<Self> {
        let len = salt.len();
        if !(MIN_PASSWORD_SALT_LENGTH..=MAX_PASSWORD_SALT_LENGTH).contains(&len) {
            return Err(DomainError::configuration(format!(
                "Password salt must be between {} and {} bytes",
                MIN_PASSWORD_SALT_LENGTH, MAX_PASSWORD_SALT_LENGTH
            )));
        }

        let salt = SaltString::encode_b64(salt.as_bytes())
            .map_err(|e| DomainError::configuration(format!("Invalid password salt: {}", e)))?;
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::configuration(format!("Invalid hash cost: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            salt,
        })
    }

    /// Hash `password` if it matches `confirmation` and is not blank.
    ///
    /// Returns `Ok(None)` for a mismatch or a blank password; callers treat
    /// that as a missing hash.
    pub fn hash(&self, password: &str, confirmation: &str) -> DomainResult<Option<String>> {
        if password != confirmation || password.trim().is_empty() {
            return Ok(None);
        }

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &self.salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(Some(hash.to_string()))
    }

    /// Hash a single password (no confirmation field on the request).
    pub fn hash_single(&self, password: &str) -> DomainResult<Option<String>> {
        self.hash(password, password)
    }
}
