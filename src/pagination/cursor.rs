use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::core::time::{format_primitive, to_primitive_utc};

/// Position of the last row of a page. Only ever seen by clients as the
/// opaque token produced by [`encode_cursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaginationCursor {
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) id: String,
}

/// A token that failed to decode. Always a client input error; the variants
/// exist for logs, the response body stays a generic 400.
#[derive(Debug, Error)]
pub(crate) enum InvalidCursor {
    #[error("cursor is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("cursor payload is not a valid JSON object")]
    Payload(#[from] serde_json::Error),
    #[error("cursor timestamp is malformed")]
    Timestamp(#[from] time::error::Parse),
}

#[derive(Debug, Deserialize)]
struct CursorPayload {
    #[serde(rename = "createdAt")]
    created_at: String,
    id: String,
}

/// Wire format: URL-safe base64 over `{"createdAt": "<RFC 3339>", "id": "<row id>"}`.
/// Key order comes from the JSON map, so equal cursors encode identically.
pub(crate) fn encode_cursor(cursor: &PaginationCursor) -> String {
    let payload = serde_json::json!({
        "createdAt": format_primitive(cursor.created_at),
        "id": cursor.id,
    });
    URL_SAFE_NO_PAD.encode(payload.to_string())
}

pub(crate) fn decode_cursor(token: &str) -> Result<PaginationCursor, InvalidCursor> {
    let raw = URL_SAFE_NO_PAD.decode(token)?;
    let payload: CursorPayload = serde_json::from_slice(&raw)?;
    let created_at = OffsetDateTime::parse(&payload.created_at, &Rfc3339)?;

    Ok(PaginationCursor { created_at: to_primitive_utc(created_at), id: payload.id })
}
