use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{OrganizationRole, PitchStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: Option<String>,
    pub(crate) hashed_password: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Organization {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct OrganizationMember {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) user_id: String,
    pub(crate) role: OrganizationRole,
    pub(crate) joined_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Song {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) title: String,
    pub(crate) artist: Option<String>,
    pub(crate) duration: Option<i32>,
    pub(crate) file_path: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) uploaded_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Pitch {
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
