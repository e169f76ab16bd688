//! Session token issuing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use common::{AppError, AppResult, JwtConfig};
use domain::{AccountView, SessionClaims};

/// Builds, signs and verifies stateless session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer from a shared secret and a lifetime in minutes.
    ///
    /// # Errors
    /// Returns a signing error for an empty secret or a non-positive lifetime.
    pub fn new(secret: &[u8], ttl_minutes: i64) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::signing("signing key is empty"));
        }
        if ttl_minutes <= 0 {
            return Err(AppError::signing("token lifetime must be positive"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes),
        })
    }

    /// Create an issuer from validated JWT configuration.
    pub fn from_config(config: &JwtConfig) -> AppResult<Self> {
        config.validate()?;
        Self::new(config.secret.as_bytes(), config.expiration_minutes)
    }

    /// Claims for `user`, issued at `now` and expiring after the configured TTL.
    pub fn claims_for(&self, user: AccountView, now: DateTime<Utc>) -> SessionClaims {
        SessionClaims::new(user, now, self.ttl)
    }

    /// Sign claims into a token string.
    pub fn issue(&self, claims: &SessionClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(AppError::signing)
    }

    /// Verify signature and expiration, returning the embedded claims.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected session token: {}", e);
                AppError::InvalidToken
            })
    }
}
