//! Error types for the server binary.
//!
//! [`StartupError`] wraps every failure mode between process start and
//! the HTTP server returning, so `main` can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: nationmind_core::ConfigError,
    },

    /// Connecting to the database or migrating it failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: nationmind_db::DbError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: nationmind_api::ServerError,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
