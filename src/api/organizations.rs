use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_org_role, CurrentUser};
use crate::api::pagination::CursorListQuery;
use crate::api::validation::validate_email;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::OrganizationRole;
use crate::pagination::Page;
use crate::repositories;
use crate::schemas::organization::{
    AddMemberRequest, MemberListItem, MemberResponse, OrganizationCreate, OrganizationListItem,
    OrganizationResponse,
};

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/:organization_id/members", get(list_members).post(add_member))
}

async fn create_organization(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<OrganizationCreate>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Organization name must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    let organization = repositories::organizations::create_with_manager(
        state.db(),
        repositories::organizations::CreateOrganization {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            description: payload.description.as_deref(),
            created_at: now,
            updated_at: now,
        },
        &Uuid::new_v4().to_string(),
        &user.id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create organization"))?;

    Ok((StatusCode::CREATED, Json(OrganizationResponse::from_db(organization))))
}

async fn list_organizations(
    Query(params): Query<CursorListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Page<OrganizationListItem>>, ApiError> {
    let request = params.into_page_request()?;

    let page = repositories::organizations::list_for_user(state.db(), &user.id, &request)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list organizations"))?;

    Ok(Json(page.map(OrganizationListItem::from_row)))
}

async fn list_members(
    Path(organization_id): Path<String>,
    Query(params): Query<CursorListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Page<MemberListItem>>, ApiError> {
    require_org_role(&state, &user, &organization_id, OrganizationRole::Manager).await?;

    let request = params.into_page_request()?;

    let page = repositories::organization_members::list_for_organization(
        state.db(),
        &organization_id,
        &request,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list organization members"))?;

    Ok(Json(page.map(MemberListItem::from_row)))
}

async fn add_member(
    Path(organization_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    require_org_role(&state, &user, &organization_id, OrganizationRole::Manager).await?;
    validate_email(&payload.email)?;

    let email = payload.email.trim().to_ascii_lowercase();
    let invitee = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up user by email"))?
        .ok_or_else(|| ApiError::NotFound(format!("User with email {email} not found")))?;

    let existing = repositories::organization_members::find_for_user_org(
        state.db(),
        &invitee.id,
        &organization_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to check existing membership"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict(
            "User is already a member of this organization".to_string(),
        ));
    }

    let member = repositories::organization_members::create(
        state.db(),
        repositories::organization_members::CreateMember {
            id: &Uuid::new_v4().to_string(),
            organization_id: &organization_id,
            user_id: &invitee.id,
            role: payload.role,
            joined_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add organization member"))?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from_db(member))))
}
