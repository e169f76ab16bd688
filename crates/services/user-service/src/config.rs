//! User service configuration.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, HashingConfig, JwtConfig};
use domain::DEFAULT_TOKEN_TTL_MINUTES;

/// Initial administrator created by the seeder.
#[derive(Clone)]
pub struct SeedConfig {
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub hashing: HashingConfig,
    /// Present only when `SEED_ADMIN_PASSWORD` is set
    pub seed: Option<SeedConfig>,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` may be absent here; it is validated when a token issuer
    /// is built, so migration and seeding commands run without it.
    ///
    /// # Errors
    /// Fails when a numeric variable does not parse.
    pub fn from_env() -> AppResult<Self> {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("USER_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.url),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_var("DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or_default(),
            expiration_minutes: parse_var("JWT_EXPIRATION_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?,
        };

        let cost = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB", cost.memory_kib)?,
            iterations: parse_var("PASSWORD_HASH_ITERATIONS", cost.iterations)?,
            parallelism: parse_var("PASSWORD_HASH_PARALLELISM", cost.parallelism)?,
        };

        let seed = env::var("SEED_ADMIN_PASSWORD").ok().map(|password| SeedConfig {
            name: env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            username: env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password,
            email: env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
            phone_number: env::var("SEED_ADMIN_PHONE").unwrap_or_default(),
        });

        Ok(Self {
            database,
            jwt,
            hashing,
            seed,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::configuration(format!("{} has an invalid value", name))),
        Err(_) => Ok(default),
    }
}
