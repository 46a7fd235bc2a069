/// Caller identity resolved from a bearer token
///
/// The HTTP layer resolves an [`Identity`] once per request and passes it
/// explicitly to every service call that depends on who is asking.
///
/// Resolution fails with:
///
/// - `ServiceError::Unauthenticated` if the header is missing or not a
///   bearer token, or the token's user no longer exists
/// - `ServiceError::TokenExpired` once the token's `exp` has passed
/// - `ServiceError::TokenInvalid` for anything else wrong with the token

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::jwt::TokenIssuer;
use crate::error::ServiceError;
use crate::models::user::User;
use crate::store::UserStore;

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Internal user ID (token subject)
    pub id: Uuid,

    /// External user ID
    pub user_id: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_id: user.user_id.clone(),
        }
    }
}

/// Extracts the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively; surrounding whitespace around
/// the token is ignored.
pub fn bearer_token(header: Option<&str>) -> Result<&str, ServiceError> {
    let header = header.ok_or(ServiceError::Unauthenticated)?.trim();

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(ServiceError::Unauthenticated)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ServiceError::Unauthenticated);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ServiceError::Unauthenticated);
    }

    Ok(token)
}

/// Resolves the caller from an `Authorization` header at instant `now`
pub async fn resolve_identity<S>(
    store: &S,
    tokens: &TokenIssuer,
    authorization: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Identity, ServiceError>
where
    S: UserStore + ?Sized,
{
    let token = bearer_token(authorization)?;
    let claims = tokens.verify(token, now)?;

    let user = store
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(sub = %claims.sub, "Token subject no longer exists");
            ServiceError::Unauthenticated
        })?;

    Ok(Identity::from(&user))
}
