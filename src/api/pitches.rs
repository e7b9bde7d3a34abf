use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_org_membership, require_org_role, CurrentUser};
use crate::api::pagination::CursorListQuery;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Song;
use crate::db::types::OrganizationRole;
use crate::pagination::Page;
use crate::repositories;
use crate::schemas::pitch::{PitchCreate, PitchResponse};


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:organization_id/songs/:song_id/pitches",
            get(list_song_pitches).post(create_pitch),
        )
        .route("/:organization_id/pitches", get(list_organization_pitches))
}

async fn create_pitch(
    Path((organization_id, song_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<PitchCreate>,
) -> Result<(StatusCode, Json<PitchResponse>), ApiError> {
    require_org_role(&state, &user, &organization_id, OrganizationRole::Manager).await?;

    if payload.description.trim().is_empty() {
        return Err(ApiError::BadRequest("Pitch description must not be empty".to_string()));
    }
    if payload.target_artists.is_empty() {
        return Err(ApiError::BadRequest(
            "Pitch must name at least one target artist".to_string(),
        ));
    }

    let song = repositories::songs::find_by_id(state.db(), &song_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch song"))?
        .ok_or_else(|| ApiError::NotFound("Song not found".to_string()))?;

    if song.organization_id != organization_id {
        return Err(ApiError::BadRequest(
            "Song does not belong to the specified organization".to_string(),
        ));
    }

    let now = primitive_now_utc();
    let pitch = repositories::pitches::create(
        state.db(),
        repositories::pitches::CreatePitch {
            id: &Uuid::new_v4().to_string(),
            song_id: &song.id,
            created_by: &user.id,
            description: payload.description.trim(),
            target_artists: payload.target_artists,
            tags: payload.tags,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create pitch"))?;

    Ok((StatusCode::CREATED, Json(PitchResponse::from_db(pitch))))
}

async fn list_song_pitches(
    Path((organization_id, song_id)): Path<(String, String)>,
    Query(params): Query<CursorListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Page<PitchResponse>>, ApiError> {
    require_org_membership(&state, &user, &organization_id).await?;
    let song = fetch_song_in_org(&state, &organization_id, &song_id).await?;

    let request = params.into_page_request()?;

    let page = repositories::pitches::list_for_song(state.db(), &song.id, &request)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list pitches"))?;

    Ok(Json(page.map(PitchResponse::from_row)))
}

async fn list_organization_pitches(
    Path(organization_id): Path<String>,
    Query(params): Query<CursorListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Page<PitchResponse>>, ApiError> {
    require_org_membership(&state, &user, &organization_id).await?;

    let request = params.into_page_request()?;

    let page = repositories::pitches::list_for_organization(state.db(), &organization_id, &request)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list pitches"))?;

    Ok(Json(page.map(PitchResponse::from_row)))
}

/// The song listing scope is the song id alone, so the org ownership check
/// has to happen before the query; otherwise a member of one organization
/// could read pitches of another by mixing path parameters.
async fn fetch_song_in_org(
    state: &AppState,
    organization_id: &str,
    song_id: &str,
) -> Result<Song, ApiError> {
    let song = repositories::songs::find_by_id(state.db(), song_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch song"))?
        .ok_or_else(|| ApiError::NotFound("Song not found".to_string()))?;

    if song.organization_id != organization_id {
        return Err(ApiError::NotFound("Song not found".to_string()));
    }

    Ok(song)
}
