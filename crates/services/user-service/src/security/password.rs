//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings: algorithm, version, cost parameters and salt are
//! embedded, so verification needs nothing but the stored string.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash,
        PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use common::{AppError, AppResult, HashingConfig};

/// One-way credential hasher with a configurable work factor.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Create a hasher from cost parameters.
    ///
    /// # Errors
    /// Returns a hashing error if Argon2 rejects the parameters.
    pub fn new(config: &HashingConfig) -> AppResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(AppError::hashing)?;

        Ok(Self { params })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Input content is never validated here.
    pub fn hash(&self, plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(AppError::hashing)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`. Only a structurally corrupt hash is an error.
    pub fn verify(&self, hash: &str, plain_text: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(AppError::hashing)?;

        // Cost parameters come from the stored hash, not from `self.params`.
        match Argon2::default().verify_password(plain_text.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(AppError::hashing(e)),
        }
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("arvel123").unwrap();

        assert!(hasher.verify(&hash, "arvel123").unwrap());
        assert!(!hasher.verify(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = hasher();
        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "SamePassword123").unwrap());
        assert!(hasher.verify(&second, "SamePassword123").unwrap());
    }

    #[test]
    fn test_hash_embeds_cost_parameters() {
        let hash = hasher().hash("anything").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_verify_uses_cost_from_stored_hash() {
        let hash = hasher().hash("arvel123").unwrap();
        let stronger = PasswordHasher::new(&HashingConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        assert!(stronger.verify(&hash, "arvel123").unwrap());
    }

    #[test]
    fn test_empty_password_is_hashed() {
        let hasher = hasher();
        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify(&hash, "").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        let result = hasher().verify("not-a-phc-string", "arvel123");
        assert!(matches!(result, Err(AppError::Hashing(_))));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        let result = PasswordHasher::new(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(AppError::Hashing(_))));
    }
}
