use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::OrganizationRole;
use crate::repositories::organization_members::MemberListRow;
use crate::repositories::organizations::OrganizationListRow;

#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationCreate {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrganizationResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl OrganizationResponse {
    pub(crate) fn from_db(organization: crate::db::models::Organization) -> Self {
        Self {
            id: organization.id,
            name: organization.name,
            description: organization.description,
            created_at: format_primitive(organization.created_at),
            updated_at: format_primitive(organization.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrganizationListItem {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl OrganizationListItem {
    pub(crate) fn from_row(row: OrganizationListRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddMemberRequest {
    pub(crate) email: String,
    pub(crate) role: OrganizationRole,
}

#[derive(Debug, Serialize)]
pub(crate) struct MemberResponse {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) user_id: String,
    pub(crate) role: OrganizationRole,
    pub(crate) joined_at: String,
}

impl MemberResponse {
    pub(crate) fn from_db(member: crate::db::models::OrganizationMember) -> Self {
        Self {
            id: member.id,
            organization_id: member.organization_id,
            user_id: member.user_id,
            role: member.role,
            joined_at: format_primitive(member.joined_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MemberListItem {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: Option<String>,
    pub(crate) role: OrganizationRole,
    pub(crate) joined_at: String,
}

impl MemberListItem {
    pub(crate) fn from_row(row: MemberListRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            user_id: row.user_id,
            email: row.email,
            name: row.name,
            role: row.role,
            joined_at: format_primitive(row.joined_at),
        }
    }
}
