//! REST endpoint handlers, one module per resource.
//!
//! Every handler checks its input before touching the database, then reads
//! or writes through the stores in `nationmind-db`. Failures are returned
//! as [`ApiError`](crate::error::ApiError).

pub mod events;
pub mod game;
pub mod nations;
pub mod relations;
pub mod turns;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiError;

/// Largest page any list endpoint returns.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// `skip` / `limit` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// Rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Rows to return (default 100).
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

pub(crate) const fn default_page_size() -> i64 {
    100
}

impl Pagination {
    /// Reject negative offsets and empty pages; clamp oversized pages.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if `skip < 0` or `limit < 1`.
    pub fn checked(self) -> Result<(i64, i64), ApiError> {
        Ok((non_negative("skip", self.skip)?, page_size(self.limit)?))
    }
}

/// Optional `limit` query parameter.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitQuery {
    /// Rows to return.
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// The requested limit, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if `limit < 1`.
    pub fn or(self, default: i64) -> Result<i64, ApiError> {
        page_size(self.limit.unwrap_or(default))
    }
}

fn non_negative(name: &str, value: i64) -> Result<i64, ApiError> {
    if value < 0 {
        return Err(ApiError::BadRequest(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(value)
}

fn page_size(limit: i64) -> Result<i64, ApiError> {
    if limit < 1 {
        return Err(ApiError::BadRequest(format!(
            "limit must be at least 1, got {limit}"
        )));
    }
    Ok(limit.min(MAX_PAGE_SIZE))
}

/// Body of the game endpoints' success replies.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable result.
    pub message: String,
    /// Always `true`.
    pub success: bool,
    /// Endpoint-specific payload.
    pub data: Value,
}

impl MessageResponse {
    /// A success reply.
    pub fn ok(message: impl Into<String>, data: Value) -> Json<Self> {
        Json(Self {
            message: message.into(),
            success: true,
            data,
        })
    }
}

/// `GET /` -- service banner.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Nation-Mind AI Backend",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/health` -- liveness check. Does not touch the database.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Backend running",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let page: Pagination = serde_json::from_str("{}").unwrap_or(Pagination { skip: -1, limit: -1 });
        assert_eq!(page.checked().ok(), Some((0, 100)));

        let huge = Pagination {
            skip: 5,
            limit: 50_000,
        };
        assert_eq!(huge.checked().ok(), Some((5, MAX_PAGE_SIZE)));

        let negative = Pagination { skip: -1, limit: 10 };
        assert!(negative.checked().is_err());

        let empty = Pagination { skip: 0, limit: 0 };
        assert!(empty.checked().is_err());
    }

    #[test]
    fn limit_query_falls_back_to_default() {
        assert_eq!(LimitQuery { limit: None }.or(20).ok(), Some(20));
        assert_eq!(LimitQuery { limit: Some(3) }.or(20).ok(), Some(3));
        assert!(LimitQuery { limit: Some(0) }.or(20).is_err());
    }
}
