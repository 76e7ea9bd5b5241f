//! Shared application state for the HTTP layer.
//!
//! Handlers hold no state of their own; everything lives in `PostgreSQL`
//! behind the pool.

use nationmind_db::PostgresPool;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub db: PostgresPool,
}

impl AppState {
    /// Wrap a connected pool.
    pub const fn new(db: PostgresPool) -> Self {
        Self { db }
    }
}
