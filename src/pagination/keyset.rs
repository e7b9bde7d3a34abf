use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

use crate::pagination::cursor::{encode_cursor, PaginationCursor};

/// A decoded pagination request: page size plus the boundary of the previous
/// page, if any. The cursor is already decoded here; token parsing happens at
/// the transport layer before any query is issued.
#[derive(Debug, Clone)]
pub(crate) struct PageRequest {
    pub(crate) limit: i64,
    pub(crate) cursor: Option<PaginationCursor>,
}

impl PageRequest {
    pub(crate) fn first_page(limit: i64) -> Self {
        Self { limit, cursor: None }
    }

    /// Rows to fetch: one past the page size. The extra row only proves a
    /// successor page exists; it never reaches the caller.
    pub(crate) fn take(&self) -> i64 {
        self.limit + 1
    }
}

/// The `(sort, tie_break)` column pair a listing is keyed on. The sort column
/// holds a timestamp that can collide between rows; the tie-break column must
/// be unique so the combined descending order is total.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeysetColumns {
    pub(crate) sort: &'static str,
    pub(crate) tie_break: &'static str,
}

impl KeysetColumns {
    /// Appends the seek condition to a WHERE clause that already holds the
    /// scope filter. A single `sort < bound` comparison would skip rows that
    /// share the boundary timestamp, hence the two-clause disjunction on
    /// `(sort, tie_break)`.
    pub(crate) fn push_boundary(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
        cursor: &PaginationCursor,
    ) {
        builder.push(" AND (");
        builder.push(self.sort);
        builder.push(" < ");
        builder.push_bind(cursor.created_at);
        builder.push(" OR (");
        builder.push(self.sort);
        builder.push(" = ");
        builder.push_bind(cursor.created_at);
        builder.push(" AND ");
        builder.push(self.tie_break);
        builder.push(" < ");
        builder.push_bind(cursor.id.clone());
        builder.push("))");
    }

    pub(crate) fn push_order_and_take(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
        request: &PageRequest,
    ) {
        builder.push(" ORDER BY ");
        builder.push(self.sort);
        builder.push(" DESC, ");
        builder.push(self.tie_break);
        builder.push(" DESC LIMIT ");
        builder.push_bind(request.take());
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) pagination: PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageMeta {
    pub(crate) limit: i64,
    pub(crate) has_more: bool,
    pub(crate) next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Projects the rows into another item type, keeping the meta intact.
    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), pagination: self.pagination }
    }
}

/// Interprets up to `take()` rows fetched in `(sort DESC, tie_break DESC)`
/// order. The over-fetched row is dropped after deciding `has_more`; the next
/// cursor points at the last row actually kept.
pub(crate) fn page_from_rows<T>(
    mut rows: Vec<T>,
    request: &PageRequest,
    cursor_key: impl Fn(&T) -> PaginationCursor,
) -> Page<T> {
    let has_more = rows.len() as i64 > request.limit;
    if has_more {
        rows.truncate(request.limit as usize);
    }

    let next_cursor =
        if has_more { rows.last().map(|last| encode_cursor(&cursor_key(last))) } else { None };

    Page { items: rows, pagination: PageMeta { limit: request.limit, has_more, next_cursor } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::cursor::decode_cursor;
    use time::macros::datetime;
    use time::PrimitiveDateTime;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        created_at: PrimitiveDateTime,
        id: String,
    }

    fn row(created_at: PrimitiveDateTime, id: &str) -> Row {
        Row { created_at, id: id.to_string() }
    }

    fn key(r: &Row) -> PaginationCursor {
        PaginationCursor { created_at: r.created_at, id: r.id.clone() }
    }

    /// In-memory model of the planned range scan: same seek disjunction,
    /// same descending order, same over-fetch count.
    fn fetch(dataset: &[Row], request: &PageRequest) -> Vec<Row> {
        let mut rows: Vec<Row> = dataset
            .iter()
            .filter(|r| match &request.cursor {
                None => true,
                Some(c) => {
                    r.created_at < c.created_at
                        || (r.created_at == c.created_at && r.id < c.id)
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(request.take() as usize);
        rows
    }

    fn next_request(page: &Page<Row>) -> Option<PageRequest> {
        page.pagination.next_cursor.as_deref().map(|token| PageRequest {
            limit: page.pagination.limit,
            cursor: Some(decode_cursor(token).expect("next cursor decodes")),
        })
    }

    /// Five rows, two of them sharing a timestamp, walked with limit 2.
    fn shared_timestamp_dataset() -> Vec<Row> {
        let t3 = datetime!(2026-03-03 12:00:00);
        vec![
            row(datetime!(2026-03-01 12:00:00), "t1"),
            row(datetime!(2026-03-02 12:00:00), "t2"),
            row(t3, "a"),
            row(t3, "b"),
            row(datetime!(2026-03-05 12:00:00), "t5"),
        ]
    }

    #[test]
    fn walks_tied_rows_without_skips_or_duplicates() {
        let dataset = shared_timestamp_dataset();

        let first = PageRequest::first_page(2);
        let page1 = page_from_rows(fetch(&dataset, &first), &first, key);
        let ids: Vec<&str> = page1.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["t5", "b"]);
        assert!(page1.pagination.has_more);

        let second = next_request(&page1).expect("second page request");
        let page2 = page_from_rows(fetch(&dataset, &second), &second, key);
        let ids: Vec<&str> = page2.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "t2"]);
        assert!(page2.pagination.has_more);

        let third = next_request(&page2).expect("third page request");
        let page3 = page_from_rows(fetch(&dataset, &third), &third, key);
        let ids: Vec<&str> = page3.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["t1"]);
        assert!(!page3.pagination.has_more);
        assert!(page3.pagination.next_cursor.is_none());
    }

    #[test]
    fn cursor_chain_yields_every_row_exactly_once() {
        // 23 rows bunched into 7 timestamps, so most page boundaries fall
        // inside a timestamp tie; walked at several page sizes.
        let base = datetime!(2026-04-01 00:00:00);
        let dataset: Vec<Row> = (0..23_i64)
            .map(|i| row(base + time::Duration::minutes(i / 4), &format!("row-{i:02}")))
            .collect();

        let mut expected = dataset.clone();
        expected.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });

        for limit in [1_i64, 2, 5, 23, 50] {
            let mut collected = Vec::new();
            let mut request = Some(PageRequest::first_page(limit));
            let mut pages = 0;

            while let Some(current) = request {
                let page = page_from_rows(fetch(&dataset, &current), &current, key);
                assert!(page.items.len() as i64 <= limit);
                if page.pagination.has_more {
                    assert_eq!(page.items.len() as i64, limit);
                }
                collected.extend(page.items.iter().cloned());
                request = next_request(&page);
                pages += 1;
                assert!(pages <= 60, "cursor chain did not terminate");
            }

            assert_eq!(collected, expected, "limit {limit}");
        }
    }

    #[test]
    fn final_page_length_is_the_remainder() {
        let base = datetime!(2026-04-01 00:00:00);
        let dataset: Vec<Row> =
            (0..7_i64).map(|i| row(base + time::Duration::seconds(i), &format!("r{i}"))).collect();

        let mut request = Some(PageRequest::first_page(3));
        let mut last_len = 0;
        while let Some(current) = request {
            let page = page_from_rows(fetch(&dataset, &current), &current, key);
            last_len = page.items.len();
            request = next_request(&page);
        }
        assert_eq!(last_len, 7 % 3);
    }

    #[test]
    fn limit_one_still_detects_more() {
        let dataset = shared_timestamp_dataset();
        let request = PageRequest::first_page(1);
        let page = page_from_rows(fetch(&dataset, &request), &request, key);

        assert_eq!(page.items.len(), 1);
        assert!(page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_some());
    }

    #[test]
    fn empty_dataset_yields_empty_page() {
        let request = PageRequest::first_page(10);
        let page = page_from_rows(fetch(&[], &request), &request, key);

        assert!(page.items.is_empty());
        assert!(!page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_none());
    }

    #[test]
    fn stale_cursor_past_the_end_yields_empty_page() {
        let dataset = shared_timestamp_dataset();
        let request = PageRequest {
            limit: 2,
            cursor: Some(PaginationCursor {
                created_at: datetime!(2026-02-01 00:00:00),
                id: "gone".into(),
            }),
        };
        let page = page_from_rows(fetch(&dataset, &request), &request, key);

        assert!(page.items.is_empty());
        assert!(!page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_none());
    }

    #[test]
    fn forged_tie_break_is_evaluated_as_given() {
        // An id that never existed between "b" and "a" at the tied timestamp
        // simply bounds the scan; rows strictly after it still come back.
        let dataset = shared_timestamp_dataset();
        let request = PageRequest {
            limit: 2,
            cursor: Some(PaginationCursor {
                created_at: datetime!(2026-03-03 12:00:00),
                id: "ab".into(),
            }),
        };
        let page = page_from_rows(fetch(&dataset, &request), &request, key);

        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "t2"]);
    }

    #[test]
    fn boundary_sql_is_a_two_clause_disjunction() {
        let mut builder =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT id FROM songs WHERE organization_id = ");
        builder.push_bind("org-1");

        let columns = KeysetColumns { sort: "created_at", tie_break: "id" };
        let cursor =
            PaginationCursor { created_at: datetime!(2026-03-03 12:00:00), id: "b".into() };
        columns.push_boundary(&mut builder, &cursor);
        columns.push_order_and_take(&mut builder, &PageRequest::first_page(2));

        assert_eq!(
            builder.sql(),
            "SELECT id FROM songs WHERE organization_id = $1 \
             AND (created_at < $2 OR (created_at = $3 AND id < $4)) \
             ORDER BY created_at DESC, id DESC LIMIT $5"
        );
    }

    #[test]
    fn map_preserves_pagination_meta() {
        let request = PageRequest::first_page(2);
        let dataset = shared_timestamp_dataset();
        let page = page_from_rows(fetch(&dataset, &request), &request, key);
        let token = page.pagination.next_cursor.clone();

        let mapped = page.map(|r| r.id);
        assert_eq!(mapped.items, vec!["t5".to_string(), "b".to_string()]);
        assert_eq!(mapped.pagination.next_cursor, token);
    }

    #[test]
    fn meta_serializes_camel_case_with_null_cursor() {
        let meta = PageMeta { limit: 2, has_more: false, next_cursor: None };
        let value = serde_json::to_value(&meta).expect("meta json");
        assert_eq!(
            value,
            serde_json::json!({"limit": 2, "hasMore": false, "nextCursor": null})
        );
    }
}
