use std::time::Duration;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the token lifetime, keeping `now + ttl` a valid timestamp.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Errors returned by token issuance and validation.
///
/// Validation failures are classified here; the underlying jsonwebtoken
/// error never leaves `validate`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by a bearer token.
///
/// - `exp` is a NumericDate with millisecond precision (fractional seconds).
///   Integer values issued by other tools deserialize as well.
/// - `sub` is omitted unless a subject was given at issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub exp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl TokenClaims {
    fn expires_at_millis(&self) -> i64 {
        (self.exp * 1000.0).round() as i64
    }
}

/// HS256 bearer-token issuer/verifier.
///
/// Immutable once built; share it with `Arc` between middleware and handlers.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenAuthenticator")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenAuthenticator {
    /// Build an authenticator from a shared secret and a token lifetime.
    ///
    /// # Panics
    ///
    /// Panics if `secret` is empty, if `ttl` is zero, or if `ttl` exceeds
    /// [`MAX_TTL`]. A misconfigured authenticator can never issue or validate
    /// safely. `Config::from_env` rejects these values before this point.
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        assert!(!secret.is_empty(), "token secret is required");
        assert!(!ttl.is_zero(), "token ttl must be greater than 0");

        let ttl = match TimeDelta::from_std(ttl) {
            Ok(ttl) if ttl <= TimeDelta::seconds(MAX_TTL.as_secs() as i64) => ttl,
            _ => panic!("token ttl must not exceed 100 years"),
        };

        // exp is checked below with millisecond precision; jsonwebtoken only
        // checks it in whole seconds with a default leeway of 60s.
        // A future nbf is rejected by jsonwebtoken and classified as invalid.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or_default()
    }

    /// Issue a token that expires `ttl` from now, optionally bound to `subject`.
    pub fn issue(&self, subject: Option<&str>) -> Result<String, TokenError> {
        let expires_at = Utc::now() + self.ttl;

        let claims = TokenClaims {
            exp: expires_at.timestamp_millis() as f64 / 1000.0,
            sub: subject.map(str::to_owned),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify `token` and return its subject (empty when none was set).
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.verify(token)?;

        if Utc::now().timestamp_millis() > claims.expires_at_millis() {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub.unwrap_or_default())
    }

    // Signature, algorithm and claim shape. Expiry is left to `validate`.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected by jsonwebtoken");
                TokenError::Invalid
            })
    }
}
