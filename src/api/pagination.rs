use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::pagination::{decode_cursor, PageRequest};

pub(crate) const fn default_limit() -> i64 {
    50
}

/// Query-string shape of every paginated listing: `?limit=&cursor=`.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CursorListQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub(crate) limit: i64,
    #[serde(default)]
    pub(crate) cursor: Option<String>,
}

impl CursorListQuery {
    /// Checks the limit and decodes the cursor token up front, so a bad
    /// request never reaches the database. Both failures are client errors.
    pub(crate) fn into_page_request(self) -> Result<PageRequest, ApiError> {
        self.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

        match self.cursor.as_deref().filter(|token| !token.is_empty()) {
            Some(token) => {
                let cursor = decode_cursor(token).map_err(|err| {
                    tracing::debug!(error = %err, "Rejected pagination cursor");
                    ApiError::BadRequest("Invalid cursor".to_string())
                })?;
                Ok(PageRequest { limit: self.limit, cursor: Some(cursor) })
            }
            None => Ok(PageRequest::first_page(self.limit)),
        }
    }
}
