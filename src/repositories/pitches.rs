use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Pitch;
use crate::db::types::PitchStatus;
use crate::pagination::{page_from_rows, KeysetColumns, Page, PageRequest, PaginationCursor};

const COLUMNS: &str = "id, song_id, created_by, description, status, target_artists, tags, \
                       created_at, updated_at";

const LIST_KEYSET: KeysetColumns = KeysetColumns { sort: "p.created_at", tie_break: "p.id" };

pub(crate) struct CreatePitch<'a> {
    pub(crate) id: &'a str,
    pub(crate) song_id: &'a str,
    pub(crate) created_by: &'a str,
    pub(crate) description: &'a str,
    pub(crate) target_artists: Vec<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PitchListRow {
    pub(crate) id: String,
    pub(crate) song_id: String,
    pub(crate) created_by: String,
    pub(crate) description: String,
    pub(crate) status: PitchStatus,
    pub(crate) target_artists: Json<Vec<String>>,
    pub(crate) tags: Json<Vec<String>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreatePitch<'_>) -> Result<Pitch, sqlx::Error> {
    sqlx::query_as::<_, Pitch>(&format!(
        "INSERT INTO pitches (
            id, song_id, created_by, description, status, target_artists, tags,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.song_id)
    .bind(params.created_by)
    .bind(params.description)
    .bind(PitchStatus::Draft)
    .bind(Json(params.target_artists))
    .bind(Json(params.tags))
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_song(
    pool: &PgPool,
    song_id: &str,
    request: &PageRequest,
) -> Result<Page<PitchListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT p.id, p.song_id, p.created_by, p.description, p.status, p.target_artists,
                p.tags, p.created_at, p.updated_at
         FROM pitches p
         WHERE p.song_id = ",
    );
    builder.push_bind(song_id);
    if let Some(cursor) = request.cursor.as_ref() {
        LIST_KEYSET.push_boundary(&mut builder, cursor);
    }
    LIST_KEYSET.push_order_and_take(&mut builder, request);

    let rows = builder.build_query_as::<PitchListRow>().fetch_all(pool).await?;

    Ok(page_from_rows(rows, request, |row| PaginationCursor {
        created_at: row.created_at,
        id: row.id.clone(),
    }))
}

/// Pitches across every song of an organization; the scope filter reaches
/// through the songs table.
pub(crate) async fn list_for_organization(
    pool: &PgPool,
    organization_id: &str,
    request: &PageRequest,
) -> Result<Page<PitchListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT p.id, p.song_id, p.created_by, p.description, p.status, p.target_artists,
                p.tags, p.created_at, p.updated_at
         FROM pitches p
         JOIN songs s ON s.id = p.song_id
         WHERE s.organization_id = ",
    );
    builder.push_bind(organization_id);
    if let Some(cursor) = request.cursor.as_ref() {
        LIST_KEYSET.push_boundary(&mut builder, cursor);
    }
    LIST_KEYSET.push_order_and_take(&mut builder, request);

    let rows = builder.build_query_as::<PitchListRow>().fetch_all(pool).await?;

    Ok(page_from_rows(rows, request, |row| PaginationCursor {
        created_at: row.created_at,
        id: row.id.clone(),
    }))
}
