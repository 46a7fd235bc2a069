/// Organization endpoints
///
/// Every endpoint here is scoped to the caller's memberships: an organization
/// the caller doesn't belong to is indistinguishable from one that doesn't
/// exist.
///
/// # Endpoints
///
/// - `GET /api/organisations` - Organizations the caller belongs to
/// - `POST /api/organisations` - Create an organization, caller becomes a member
/// - `GET /api/organisations/:orgId` - One organization
/// - `GET /api/organisations/:orgId/users` - Its members
/// - `POST /api/organisations/:orgId/users` - Add a user to it

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::ApiResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use orgauth_shared::{
    auth::identity::Identity,
    models::{organization::OrganizationView, user::PublicUser},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create organization request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganisationRequest {
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
    )]
    pub name: Option<String>,

    pub description: Option<String>,
}

/// Add member request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[validate(
        required(message = "The user id field is required."),
        length(min = 1, message = "The user id field is required.")
    )]
    pub user_id: Option<String>,
}

/// `data` of the listing response
#[derive(Debug, Serialize)]
pub struct OrganisationList {
    pub organizations: Vec<OrganizationView>,
}

/// `data` of the member listing response
#[derive(Debug, Serialize)]
pub struct MemberList {
    pub users: Vec<PublicUser>,
}

/// List the caller's organizations, oldest membership first
pub async fn index(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
) -> ApiResult<Json<ApiResponse<OrganisationList>>> {
    let organizations = state.services.organizations.index(&caller).await?;

    Ok(Json(ApiResponse::success(
        "Organizations retrieved successfully",
        OrganisationList { organizations },
    )))
}

/// Create an organization
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `400 Bad Request`: Organization could not be stored
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    ValidatedJson(req): ValidatedJson<CreateOrganisationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OrganizationView>>)> {
    let organization = state
        .services
        .organizations
        .create(&caller, req.name.unwrap_or_default(), req.description)
        .await
        .map_err(ApiError::organization_creation)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Organization created successfully", organization)),
    ))
}

/// Show one organization
///
/// # Errors
///
/// - `404 Not Found`: No such organization, or the caller is not a member
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(org_id): Path<String>,
) -> ApiResult<Json<ApiResponse<OrganizationView>>> {
    let organization = state.services.organizations.show(&caller, &org_id).await?;

    Ok(Json(ApiResponse::success(
        "Organization retrieved successfully",
        organization,
    )))
}

/// List an organization's members
pub async fn members(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(org_id): Path<String>,
) -> ApiResult<Json<ApiResponse<MemberList>>> {
    let users = state.services.organizations.members(&caller, &org_id).await?;

    Ok(Json(ApiResponse::success(
        "Members retrieved successfully",
        MemberList { users },
    )))
}

/// Add a user to an organization
///
/// Adding an existing member succeeds and changes nothing.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: `userId` missing
/// - `404 Not Found`: Caller is not a member, or no such user
pub async fn add_member(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(org_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let user_id = req.user_id.unwrap_or_default();

    let added = state
        .services
        .organizations
        .add_member(&caller, &org_id, &user_id)
        .await?;

    if !added {
        tracing::debug!(org_id = %org_id, user_id = %user_id, "User already a member");
    }

    Ok(Json(ApiResponse::message(
        "User added to organization successfully",
    )))
}
