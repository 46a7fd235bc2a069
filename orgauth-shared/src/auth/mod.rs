/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuance and verification
/// - [`identity`]: Resolving the caller from an `Authorization` header
/// - [`authorization`]: Membership-gated access checks
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use orgauth_shared::auth::jwt::TokenIssuer;
/// use orgauth_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let issuer = TokenIssuer::with_default_ttl("secret-key-that-is-at-least-32-bytes");
/// let token = issuer.issue(Uuid::new_v4(), Utc::now())?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod identity;
pub mod jwt;
pub mod password;
