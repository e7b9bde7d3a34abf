use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::OrganizationMember;
use crate::db::types::OrganizationRole;
use crate::pagination::{page_from_rows, KeysetColumns, Page, PageRequest, PaginationCursor};

const COLUMNS: &str = "id, organization_id, user_id, role, joined_at";

const LIST_KEYSET: KeysetColumns = KeysetColumns { sort: "m.joined_at", tie_break: "m.id" };

pub(crate) struct CreateMember<'a> {
    pub(crate) id: &'a str,
    pub(crate) organization_id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) role: OrganizationRole,
    pub(crate) joined_at: PrimitiveDateTime,
}

/// One member row joined with its user, as shown in the members listing.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MemberListRow {
    pub(crate) id: String,
    pub(crate) organization_id: String,
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) name: Option<String>,
    pub(crate) role: OrganizationRole,
    pub(crate) joined_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateMember<'_>,
) -> Result<OrganizationMember, sqlx::Error> {
    sqlx::query_as::<_, OrganizationMember>(&format!(
        "INSERT INTO organization_members (id, organization_id, user_id, role, joined_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.organization_id)
    .bind(params.user_id)
    .bind(params.role)
    .bind(params.joined_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_for_user_org(
    pool: &PgPool,
    user_id: &str,
    organization_id: &str,
) -> Result<Option<OrganizationMember>, sqlx::Error> {
    sqlx::query_as::<_, OrganizationMember>(&format!(
        "SELECT {COLUMNS} FROM organization_members WHERE user_id = $1 AND organization_id = $2"
    ))
    .bind(user_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_organization(
    pool: &PgPool,
    organization_id: &str,
    request: &PageRequest,
) -> Result<Page<MemberListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT m.id, m.organization_id, m.user_id, u.email, u.name, m.role, m.joined_at
         FROM organization_members m
         JOIN users u ON u.id = m.user_id
         WHERE m.organization_id = ",
    );
    builder.push_bind(organization_id);
    if let Some(cursor) = request.cursor.as_ref() {
        LIST_KEYSET.push_boundary(&mut builder, cursor);
    }
    LIST_KEYSET.push_order_and_take(&mut builder, request);

    let rows = builder.build_query_as::<MemberListRow>().fetch_all(pool).await?;

    Ok(page_from_rows(rows, request, |row| PaginationCursor {
        created_at: row.joined_at,
        id: row.id.clone(),
    }))
}
