use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::songs::SongListRow;

#[derive(Debug, Deserialize)]
pub(crate) struct SongCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) artist: Option<String>,
    #[serde(default)]
    pub(crate) duration: Option<i32>,
    #[serde(alias = "filePath")]
    pub(crate) file_path: String,
    #[serde(default)]
    #[serde(alias = "mimeType")]
    pub(crate) mime_type: Option<String>,
    #[serde(default)]
    #[serde(alias = "fileSize")]
    pub(crate) file_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SongResponse {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) title: String,
    pub(crate) artist: Option<String>,
    pub(crate) duration: Option<i32>,
    pub(crate) file_path: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) uploaded_by: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SongResponse {
    pub(crate) fn from_db(song: crate::db::models::Song) -> Self {
        Self {
            id: song.id,
            organization_id: song.organization_id,
            title: song.title,
            artist: song.artist,
            duration: song.duration,
            file_path: song.file_path,
            mime_type: song.mime_type,
            file_size: song.file_size,
            uploaded_by: song.uploaded_by,
            created_at: format_primitive(song.created_at),
            updated_at: format_primitive(song.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SongListItem {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) artist: Option<String>,
    pub(crate) duration: Option<i32>,
    pub(crate) mime_type: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) uploaded_by: String,
    pub(crate) uploader_name: Option<String>,
    pub(crate) uploader_email: String,
    pub(crate) created_at: String,
}

impl SongListItem {
    pub(crate) fn from_row(row: SongListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            artist: row.artist,
            duration: row.duration,
            mime_type: row.mime_type,
            file_size: row.file_size,
            uploaded_by: row.uploaded_by,
            uploader_name: row.uploader_name,
            uploader_email: row.uploader_email,
            created_at: format_primitive(row.created_at),
        }
    }
}
