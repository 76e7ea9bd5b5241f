//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`]. Constraint violations reported
//! by `PostgreSQL` are split out of the generic [`sqlx::Error`] so callers
//! can tell a duplicate or a dangling reference from an outage.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique constraint rejected the write (SQLSTATE `23505`).
    #[error("{0}")]
    UniqueViolation(String),

    /// A foreign key pointed at a missing row (SQLSTATE `23503`).
    #[error("{0}")]
    ForeignKeyViolation(String),

    /// A CHECK constraint rejected the write (SQLSTATE `23514`).
    #[error("{0}")]
    CheckViolation(String),

    /// An arithmetic result left the column's range (SQLSTATE `22003`).
    #[error("{0}")]
    OutOfRange(String),

    /// A stored value could not be mapped back into a domain type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

const NUMERIC_OUT_OF_RANGE: &str = "22003";

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return Self::Postgres(err);
        };
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            Self::UniqueViolation(format!("duplicate value violates {constraint}"))
        } else if db_err.is_foreign_key_violation() {
            Self::ForeignKeyViolation(format!("referenced row missing ({constraint})"))
        } else if db_err.is_check_violation() {
            Self::CheckViolation(format!("value out of range ({constraint})"))
        } else if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
            Self::OutOfRange(String::from("numeric value out of range"))
        } else {
            Self::Postgres(err)
        }
    }
}

impl DbError {
    /// Replace the message of a unique violation, leaving other errors as is.
    #[must_use]
    pub fn on_duplicate(self, message: impl FnOnce() -> String) -> Self {
        match self {
            Self::UniqueViolation(_) => Self::UniqueViolation(message()),
            other => other,
        }
    }
}
