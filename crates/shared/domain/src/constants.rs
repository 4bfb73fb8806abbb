//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Administrator role, required for role grants and account lookups
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Authentication
// =============================================================================

/// Session token lifetime used when the caller does not ask for one
pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Longest session token lifetime a caller or the configuration may ask for (one year)
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 525_600;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Password hashing
// =============================================================================

/// Shortest accepted hashing salt, in bytes (Argon2 lower bound)
pub const MIN_PASSWORD_SALT_LENGTH: usize = 8;

/// Longest accepted hashing salt, in bytes (fits a 64-char PHC salt string)
pub const MAX_PASSWORD_SALT_LENGTH: usize = 48;

/// Argon2 memory cost in KiB (OWASP recommendation)
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Argon2 iteration count (OWASP recommendation)
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;

/// Argon2 lanes
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;

// =============================================================================
// Result messages
// =============================================================================

pub const MSG_CREATED: &str = "Account created";
pub const MSG_ALREADY_REGISTERED: &str = "Account already registered";
pub const MSG_LOGGED_IN: &str = "Logged in";
pub const MSG_ROLE_GRANTED: &str = "Role granted";
pub const MSG_UPDATED: &str = "Account updated";
pub const MSG_ALREADY_ACTUAL: &str = "Account data is already actual";
pub const MSG_DELETED: &str = "Account deleted";
