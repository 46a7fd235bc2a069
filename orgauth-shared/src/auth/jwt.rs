/// Bearer token issuance and verification
///
/// Tokens are HS256-signed JWTs bound to a user's internal identity (`sub`).
/// Every token carries an `exp` claim computed from a configurable TTL.
///
/// # Expiry
///
/// Expiry is evaluated against the `now` passed to [`TokenIssuer::verify`],
/// which the HTTP layer takes from its request clock. A token accepted at
/// `exp - 1s` is rejected at `exp`, including tokens that were accepted
/// earlier in the same session. There is no refresh or rotation.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use orgauth_shared::auth::jwt::{JwtError, TokenIssuer};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = TokenIssuer::new("test-secret-key-at-least-32-bytes-long", Duration::minutes(60));
/// let user_id = Uuid::new_v4();
/// let now = Utc::now();
///
/// let token = issuer.issue(user_id, now)?;
/// assert_eq!(issuer.verify(&token.token, now)?.sub, user_id);
///
/// let later = now + Duration::minutes(61);
/// assert!(matches!(issuer.verify(&token.token, later), Err(JwtError::Expired)));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Value of the `iss` claim on every token
pub const ISSUER: &str = "orgauth";

/// Default token lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Longest accepted token lifetime in minutes (one year)
pub const MAX_TTL_MINUTES: i64 = 525_600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued for a time that has not started yet
    #[error("Token is not yet valid")]
    NotYetValid,

    /// Token was not issued by this service
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Signature, structure or claims are invalid
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - internal user ID
    pub sub: Uuid,

    /// Issuer - always "orgauth"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Builds claims for `user_id` issued at `now` and valid for `ttl`
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if `now + ttl` is out of range
    pub fn new(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Result<Self, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::CreateError("Token expiry out of range".to_string()))?;

        Ok(Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Checks whether the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Encoded JWT
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer signing with `secret` and issuing tokens valid for `ttl`
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Creates an issuer with the default 60 minute TTL
    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Issues a token bound to `user_id`, valid from `now` for the configured TTL
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if the expiry is out of range or
    /// encoding fails
    pub fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<AccessToken, JwtError> {
        let claims = Claims::new(user_id, now, self.ttl)?;
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| JwtError::CreateError("Token expiry out of range".to_string()))?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Verifies a token's signature and claims at instant `now`
    ///
    /// The library's own time checks are disabled so that `now` is the only
    /// time source; `exp` and `nbf` are compared here without leeway.
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` once `now >= exp`
    /// - `JwtError::NotYetValid` if `now < nbf`
    /// - `JwtError::InvalidIssuer` if `iss` is not "orgauth"
    /// - `JwtError::Invalid` for bad signatures, malformed tokens or missing claims
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        let claims = token_data.claims;

        if claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        if now.timestamp() < claims.nbf {
            return Err(JwtError::NotYetValid);
        }

        Ok(claims)
    }
}
