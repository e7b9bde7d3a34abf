use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::PitchStatus;
use crate::repositories::pitches::PitchListRow;

#[derive(Debug, Deserialize)]
pub(crate) struct PitchCreate {
    pub(crate) description: String,
    #[serde(alias = "targetArtists")]
    pub(crate) target_artists: Vec<String>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PitchResponse {
    pub(crate) id: String,
    pub(crate) song_id: String,
    pub(crate) created_by: String,
    pub(crate) description: String,
    pub(crate) status: PitchStatus,
    pub(crate) target_artists: Vec<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PitchResponse {
    pub(crate) fn from_db(pitch: crate::db::models::Pitch) -> Self {
        Self {
            id: pitch.id,
            song_id: pitch.song_id,
            created_by: pitch.created_by,
            description: pitch.description,
            status: pitch.status,
            target_artists: pitch.target_artists.0,
            tags: pitch.tags.0,
            created_at: format_primitive(pitch.created_at),
            updated_at: format_primitive(pitch.updated_at),
        }
    }

    pub(crate) fn from_row(row: PitchListRow) -> Self {
        Self {
            id: row.id,
            song_id: row.song_id,
            created_by: row.created_by,
            description: row.description,
            status: row.status,
            target_artists: row.target_artists.0,
            tags: row.tags.0,
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
        }
    }
}
