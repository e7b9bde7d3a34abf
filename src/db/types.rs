use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "orgrole", rename_all = "lowercase")]
pub(crate) enum OrganizationRole {
    Manager,
    Songwriter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "pitchstatus", rename_all = "lowercase")]
pub(crate) enum PitchStatus {
    Draft,
    Submitted,
    Accepted,
    Rejected,
}
