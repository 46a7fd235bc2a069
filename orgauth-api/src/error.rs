/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`. Service errors convert into [`ApiError`],
/// which renders one of two bodies:
///
/// - `{"status", "message", "statusCode"}` for 400, 401, 404 and 500
/// - `{"errors": [{"field", "message"}]}` with 422 for field validation
///
/// # Example
///
/// ```
/// use axum::Json;
/// use orgauth_api::error::{ApiError, ApiResult};
/// use serde_json::{json, Value};
///
/// async fn handler(id: Option<String>) -> ApiResult<Json<Value>> {
///     let id = id.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orgauth_shared::error::{FieldError, ServiceError, EMAIL_TAKEN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Validation error detail, as rendered in the `errors` array
pub type ValidationErrorDetail = FieldError;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest {
        status: &'static str,
        message: String,
    },

    /// Unauthorized (401)
    Unauthorized {
        status: &'static str,
        message: String,
    },

    /// Not found (404)
    NotFound(String),

    /// Unprocessable entity (422) - field validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Error body for everything except field validation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Short status phrase, e.g. "Bad request"
    pub status: String,

    /// Human-readable message
    pub message: String,

    /// HTTP status code, repeated in the body
    pub status_code: u16,
}

/// Error body for field validation failures
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<ValidationErrorDetail>,
}

impl ApiError {
    /// 400 with the generic "Bad request" status phrase
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            status: "Bad request",
            message: message.into(),
        }
    }

    /// 401 with the generic "Unauthorized" status phrase
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            status: "Unauthorized",
            message: message.into(),
        }
    }

    /// Maps a registration failure
    ///
    /// Anything that isn't a field error or an internal failure is reported as
    /// an unsuccessful registration.
    pub fn registration(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(msg) => {
                tracing::error!(error = %msg, "Registration failed in storage");
                ApiError::BadRequest {
                    status: "Bad request",
                    message: "Registration unsuccessful".to_string(),
                }
            }
            other => ApiError::from(other),
        }
    }

    /// Maps a login failure
    ///
    /// Wrong password and unknown email produce the same body.
    pub fn login(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => ApiError::Unauthorized {
                status: "Incorrect credentials",
                message: "Authentication failed".to_string(),
            },
            other => ApiError::from(other),
        }
    }

    /// Maps an organization creation failure
    pub fn organization_creation(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(msg) => {
                tracing::error!(error = %msg, "Organization creation failed in storage");
                ApiError::BadRequest {
                    status: "Bad Request",
                    message: "Client error".to_string(),
                }
            }
            other => ApiError::from(other),
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            ApiError::Unauthorized { message, .. } => write!(f, "Unauthorized: {}", message),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();

        let (phrase, message) = match self {
            ApiError::ValidationError(errors) => {
                return (code, Json(ValidationErrorResponse { errors })).into_response();
            }
            ApiError::BadRequest { status, message } => (status, message),
            ApiError::Unauthorized { status, message } => (status, message),
            ApiError::NotFound(message) => ("Not found", message),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ("Internal server error", "An internal error occurred".to_string())
            }
        };

        let body = Json(ErrorResponse {
            status: phrase.to_string(),
            message,
            status_code: code.as_u16(),
        });

        (code, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::ValidationError(errors),
            ServiceError::DuplicateEmail => {
                ApiError::ValidationError(vec![FieldError::new("email", EMAIL_TAKEN)])
            }
            ServiceError::InvalidCredentials => ApiError::unauthorized("Authentication failed"),
            ServiceError::Unauthenticated => ApiError::unauthorized("Authentication required"),
            ServiceError::TokenExpired => ApiError::unauthorized("Token expired"),
            ServiceError::TokenInvalid => ApiError::unauthorized("Invalid token"),
            ServiceError::OrganizationNotFound => {
                ApiError::NotFound("Organization not found".to_string())
            }
            ServiceError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            ServiceError::Storage(msg) => ApiError::InternalError(format!("Storage error: {}", msg)),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}
