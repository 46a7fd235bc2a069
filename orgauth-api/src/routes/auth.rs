/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user with a default organization
/// - `POST /api/auth/login` - Exchange email and password for an access token
///
/// Both return the same `data` shape:
///
/// ```json
/// {
///   "accessToken": "eyJ...",
///   "user": {
///     "userId": "...",
///     "firstName": "Ada",
///     "lastName": "Lovelace",
///     "email": "ada@example.com",
///     "phone": null
///   }
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::ApiResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use orgauth_shared::service::{credentials::NewCredentials, registration::AuthSession};
use serde::Deserialize;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "The first name field is required."),
        length(min = 1, max = 255, message = "The first name must be between 1 and 255 characters.")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "The last name field is required."),
        length(min = 1, max = 255, message = "The last name must be between 1 and 255 characters.")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(min = 6, message = "The password must be at least 6 characters.")
    )]
    pub password: Option<String>,

    #[validate(length(max = 15, message = "The phone must not be greater than 15 characters."))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(min = 1, message = "The password field is required.")
    )]
    pub password: Option<String>,
}

/// Register a new user
///
/// Creates the user and their default organization `"<firstName>'s
/// Organization"` in one step, then signs them in.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or email already taken
/// - `400 Bad Request`: Registration could not be stored
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    let credentials = NewCredentials {
        first_name: req.first_name.unwrap_or_default(),
        last_name: req.last_name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
        phone: req.phone,
    };

    let session = state
        .services
        .auth
        .register(credentials)
        .await
        .map_err(ApiError::registration)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Registration successful", session)),
    ))
}

/// Log in with email and password
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthSession>>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let session = state
        .services
        .auth
        .login(&email, &password)
        .await
        .map_err(ApiError::login)?;

    Ok(Json(ApiResponse::success("Login successful", session)))
}
