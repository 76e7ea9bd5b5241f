//! REST API for the Nation-Mind game backend.
//!
//! An Axum server exposing CRUD endpoints for nations, turns, events and
//! relations, plus the game endpoints that initialize a game, resolve
//! actions and advance turns.
//!
//! # Architecture
//!
//! Handlers are stateless. Each one validates its input, then calls the
//! stores or the transactional game operations in `nationmind-db`.
//! Every failure, including malformed JSON, query strings and path
//! segments, is rendered as `{"error": ..., "status": ...}` by
//! [`ApiError`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
