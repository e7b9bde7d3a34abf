use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_org_membership, CurrentUser};
use crate::api::pagination::CursorListQuery;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::pagination::Page;
use crate::repositories;
use crate::schemas::song::{SongCreate, SongListItem, SongResponse};


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:organization_id/songs", get(list_songs).post(create_song))
        .route("/:organization_id/songs/:song_id", get(get_song))
}

async fn create_song(
    Path(organization_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SongCreate>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
    require_org_membership(&state, &user, &organization_id).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Song title must not be empty".to_string()));
    }
    if payload.file_path.trim().is_empty() {
        return Err(ApiError::BadRequest("Song file path must not be empty".to_string()));
    }
    if payload.duration.is_some_and(|duration| duration < 0) {
        return Err(ApiError::BadRequest("Song duration must not be negative".to_string()));
    }

    let now = primitive_now_utc();
    let song = repositories::songs::create(
        state.db(),
        repositories::songs::CreateSong {
            id: &Uuid::new_v4().to_string(),
            organization_id: &organization_id,
            title: payload.title.trim(),
            artist: payload.artist.as_deref(),
            duration: payload.duration,
            file_path: payload.file_path.trim(),
            mime_type: payload.mime_type.as_deref(),
            file_size: payload.file_size,
            uploaded_by: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create song"))?;

    Ok((StatusCode::CREATED, Json(SongResponse::from_db(song))))
}

async fn list_songs(
    Path(organization_id): Path<String>,
    Query(params): Query<CursorListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Page<SongListItem>>, ApiError> {
    require_org_membership(&state, &user, &organization_id).await?;

    let request = params.into_page_request()?;

    let page = repositories::songs::list_for_organization(state.db(), &organization_id, &request)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list songs"))?;

    Ok(Json(page.map(SongListItem::from_row)))
}

async fn get_song(
    Path((organization_id, song_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SongResponse>, ApiError> {
    require_org_membership(&state, &user, &organization_id).await?;

    let song = repositories::songs::find_by_id(state.db(), &song_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch song"))?;

    match song {
        Some(song) if song.organization_id == organization_id => {
            Ok(Json(SongResponse::from_db(song)))
        }
        _ => Err(ApiError::NotFound("Song not found".to_string())),
    }
}
