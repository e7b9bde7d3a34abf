//! Cursor-based keyset pagination, shared by every listing endpoint.
//!
//! A page boundary is the `(created_at, id)` pair of the last row returned.
//! It round-trips through clients as an opaque base64 token; the query side
//! turns it into a seek predicate and the result side turns an over-fetched
//! row set back into a page plus the next token.

pub(crate) mod cursor;
pub(crate) mod keyset;

pub(crate) use cursor::{decode_cursor, InvalidCursor, PaginationCursor};
pub(crate) use keyset::{page_from_rows, KeysetColumns, Page, PageRequest};
