use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{OrganizationMember, User};
use crate::db::types::OrganizationRole;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentUser(user))
    }
}

pub(crate) async fn require_org_membership(
    state: &AppState,
    user: &User,
    organization_id: &str,
) -> Result<OrganizationMember, ApiError> {
    let membership = repositories::organization_members::find_for_user_org(
        state.db(),
        &user.id,
        organization_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to fetch organization membership"))?;

    let Some(membership) = membership else {
        return Err(ApiError::Forbidden("Membership required for this organization"));
    };

    Ok(membership)
}

pub(crate) async fn require_org_role(
    state: &AppState,
    user: &User,
    organization_id: &str,
    role: OrganizationRole,
) -> Result<OrganizationMember, ApiError> {
    let membership = require_org_membership(state, user, organization_id).await?;

    if membership.role == role {
        return Ok(membership);
    }

    Err(ApiError::Forbidden("Not enough permissions for this organization"))
}
