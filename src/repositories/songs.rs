use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Song;
use crate::pagination::{page_from_rows, KeysetColumns, Page, PageRequest, PaginationCursor};

const COLUMNS: &str = "id, organization_id, title, artist, duration, file_path, mime_type, \
                       file_size, uploaded_by, created_at, updated_at";

const LIST_KEYSET: KeysetColumns = KeysetColumns { sort: "s.created_at", tie_break: "s.id" };

pub(crate) struct CreateSong<'a> {
    pub(crate) id: &'a str,
    pub(crate) organization_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) artist: Option<&'a str>,
    pub(crate) duration: Option<i32>,
    pub(crate) file_path: &'a str,
    pub(crate) mime_type: Option<&'a str>,
    pub(crate) file_size: Option<i64>,
    pub(crate) uploaded_by: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// One song joined with its uploader, as shown in the songs listing.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SongListRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) artist: Option<String>,
    pub(crate) duration: Option<i32>,
    pub(crate) mime_type: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) uploaded_by: String,
    pub(crate) uploader_name: Option<String>,
    pub(crate) uploader_email: String,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateSong<'_>) -> Result<Song, sqlx::Error> {
    sqlx::query_as::<_, Song>(&format!(
        "INSERT INTO songs (
            id, organization_id, title, artist, duration, file_path, mime_type,
            file_size, uploaded_by, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.organization_id)
    .bind(params.title)
    .bind(params.artist)
    .bind(params.duration)
    .bind(params.file_path)
    .bind(params.mime_type)
    .bind(params.file_size)
    .bind(params.uploaded_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, song_id: &str) -> Result<Option<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>(&format!("SELECT {COLUMNS} FROM songs WHERE id = $1"))
        .bind(song_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_for_organization(
    pool: &PgPool,
    organization_id: &str,
    request: &PageRequest,
) -> Result<Page<SongListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT s.id, s.title, s.artist, s.duration, s.mime_type, s.file_size, s.uploaded_by,
                u.name AS uploader_name, u.email AS uploader_email, s.created_at
         FROM songs s
         JOIN users u ON u.id = s.uploaded_by
         WHERE s.organization_id = ",
    );
    builder.push_bind(organization_id);
    if let Some(cursor) = request.cursor.as_ref() {
        LIST_KEYSET.push_boundary(&mut builder, cursor);
    }
    LIST_KEYSET.push_order_and_take(&mut builder, request);

    let rows = builder.build_query_as::<SongListRow>().fetch_all(pool).await?;

    Ok(page_from_rows(rows, request, |row| PaginationCursor {
        created_at: row.created_at,
        id: row.id.clone(),
    }))
}
