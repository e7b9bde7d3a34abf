use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize)]
pub(crate) struct UserSignup {
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: crate::db::models::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
            updated_at: format_primitive(user.updated_at),
        }
    }
}
