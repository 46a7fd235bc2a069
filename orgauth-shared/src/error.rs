/// Service-level error taxonomy
///
/// Every service operation fails with a [`ServiceError`]. The HTTP layer maps
/// each variant to a status code and body; nothing here knows about HTTP.

use crate::auth::jwt::JwtError;
use crate::store::StoreError;

/// Message attached to the `email` field when the address is taken
pub const EMAIL_TAKEN: &str = "The email has already been taken.";

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    /// Field name as the client sent it (camelCase)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Email is already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable identity on the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Bearer token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Bearer token is malformed or not ours
    #[error("Invalid token")]
    TokenInvalid,

    /// Organization doesn't exist or the caller is not a member
    #[error("Organization not found")]
    OrganizationNotFound,

    /// User doesn't exist or is not visible to the caller
    #[error("User not found")]
    UserNotFound,

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else that should never happen
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ServiceError::DuplicateEmail,
            StoreError::Conflict(what) => ServiceError::Storage(format!("Conflict: {}", what)),
            StoreError::Database(e) => ServiceError::Storage(e.to_string()),
        }
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ServiceError::TokenExpired,
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            JwtError::NotYetValid | JwtError::InvalidIssuer | JwtError::Invalid(_) => {
                ServiceError::TokenInvalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(
            ServiceError::from(JwtError::Expired),
            ServiceError::TokenExpired
        ));
        assert!(matches!(
            ServiceError::from(JwtError::Invalid("bad".into())),
            ServiceError::TokenInvalid
        ));
        assert!(matches!(
            ServiceError::from(JwtError::InvalidIssuer),
            ServiceError::TokenInvalid
        ));
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ServiceError::from(StoreError::DuplicateEmail),
            ServiceError::DuplicateEmail
        ));
        assert!(matches!(
            ServiceError::from(StoreError::Conflict("org_id".into())),
            ServiceError::Storage(_)
        ));
    }
}
