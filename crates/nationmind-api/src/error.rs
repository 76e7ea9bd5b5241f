//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies game-rule, persistence and request-parsing failures
//! into a single enum that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"error": <message>, "status": <code>}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nationmind_core::GameError;
use nationmind_db::{DbError, PersistError};

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The input broke a field constraint or a structural rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A game rule rejected the request.
    #[error("{0}")]
    BusinessRule(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The path, query string or body could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// The database failed.
    #[error("database error: {0}")]
    Database(DbError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BusinessRule(_) | Self::Conflict(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotFound(msg) => Self::NotFound(msg),
            GameError::Validation(msg) => Self::Validation(msg),
            GameError::BusinessRule(msg) => Self::BusinessRule(msg),
            GameError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(msg) => Self::Conflict(msg),
            DbError::ForeignKeyViolation(msg) => Self::NotFound(msg),
            DbError::CheckViolation(msg) | DbError::OutOfRange(msg) => Self::Validation(msg),
            other => Self::Database(other),
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Game(e) => e.into(),
            PersistError::Db(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GameError::from(errors).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
