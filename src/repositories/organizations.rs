use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Organization;
use crate::db::types::OrganizationRole;
use crate::pagination::{page_from_rows, KeysetColumns, Page, PageRequest, PaginationCursor};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

const LIST_KEYSET: KeysetColumns = KeysetColumns { sort: "o.created_at", tie_break: "o.id" };

pub(crate) struct CreateOrganization<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrganizationListRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Inserts the organization and its creator's manager membership in one
/// transaction, so no organization can exist without a manager.
pub(crate) async fn create_with_manager(
    pool: &PgPool,
    params: CreateOrganization<'_>,
    membership_id: &str,
    creator_id: &str,
) -> Result<Organization, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let organization = sqlx::query_as::<_, Organization>(&format!(
        "INSERT INTO organizations (id, name, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.description)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO organization_members (id, organization_id, user_id, role, joined_at)
         VALUES ($1,$2,$3,$4,$5)",
    )
    .bind(membership_id)
    .bind(&organization.id)
    .bind(creator_id)
    .bind(OrganizationRole::Manager)
    .bind(params.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(organization)
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
    request: &PageRequest,
) -> Result<Page<OrganizationListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT o.id, o.name, o.description, o.created_at, o.updated_at
         FROM organizations o
         JOIN organization_members m ON m.organization_id = o.id
         WHERE m.user_id = ",
    );
    builder.push_bind(user_id);
    if let Some(cursor) = request.cursor.as_ref() {
        LIST_KEYSET.push_boundary(&mut builder, cursor);
    }
    LIST_KEYSET.push_order_and_take(&mut builder, request);

    let rows = builder.build_query_as::<OrganizationListRow>().fetch_all(pool).await?;

    Ok(page_from_rows(rows, request, |row| PaginationCursor {
        created_at: row.created_at,
        id: row.id.clone(),
    }))
}
