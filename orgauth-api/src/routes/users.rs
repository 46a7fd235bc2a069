/// User endpoints
///
/// - `GET /api/users/:userId` - A user's public profile, visible to the user
///   themselves and to anyone sharing an organization with them

use crate::{app::AppState, error::ApiResult, routes::ApiResponse};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use orgauth_shared::{auth::identity::Identity, models::user::PublicUser};

/// Show a user
///
/// # Errors
///
/// - `404 Not Found`: No such user, or the caller shares no organization with them
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<PublicUser>>> {
    let user = state.services.users.show(&caller, &user_id).await?;

    Ok(Json(ApiResponse::success("User retrieved successfully", user)))
}
