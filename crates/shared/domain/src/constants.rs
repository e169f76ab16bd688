//! Domain-level constants.
//!
//! These constants define business rules shared by the account core.

// =============================================================================
// Roles
// =============================================================================

/// Administrator role code (seeded, never assigned at registration)
pub const ROLE_ADMIN: &str = "ADMIN";

/// Administrator role display name
pub const ROLE_ADMIN_NAME: &str = "Administrator";

/// Customer role code
pub const ROLE_CUSTOMER: &str = "CUSTOMER";

/// Customer role display name
pub const ROLE_CUSTOMER_NAME: &str = "Customer";

/// Role given to every self-registered account
pub const DEFAULT_ROLE_CODE: &str = ROLE_CUSTOMER;

/// Seeded roles as (code, display name)
pub const SEEDED_ROLES: &[(&str, &str)] = &[
    (ROLE_ADMIN, ROLE_ADMIN_NAME),
    (ROLE_CUSTOMER, ROLE_CUSTOMER_NAME),
];

// =============================================================================
// Authentication
// =============================================================================

/// Default session token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Minimum signing secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Password hashing (Argon2id defaults)
// =============================================================================

/// Default memory cost in KiB
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Default number of passes
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;

/// Default degree of parallelism
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
