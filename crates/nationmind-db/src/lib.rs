//! `PostgreSQL` persistence for the Nation-Mind game backend.
//!
//! Every store wraps a `&mut PgConnection`, so the same calls run on a
//! pooled connection for reads or inside a transaction for multi-step
//! writes. [`game_persist`] owns those transactions.
//!
//! ```text
//! HTTP handler
//!     |
//!     +-- single-table CRUD ---> NationStore / TurnStore / EventStore / RelationStore
//!     |
//!     +-- game operations -----> game_persist (one transaction each)
//!                                    |-- nationmind-core plans
//!                                    +-- stores above
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration and migrations
//! - [`nation_store`] -- Nations, with soft delete and resource deltas
//! - [`turn_store`] -- Turns and the locked turn advance
//! - [`event_store`] -- Append-only game log queries
//! - [`relation_store`] -- Canonical-pair relations and upsert
//! - [`game_persist`] -- Initialization, actions and turn advance
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod game_persist;
pub mod nation_store;
pub mod postgres;
pub mod relation_store;
pub mod turn_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventRow, EventStore};
pub use game_persist::{InitializedGame, PersistError};
pub use nation_store::{NationRow, NationStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use relation_store::{RelationRow, RelationStore};
pub use turn_store::{TurnRow, TurnStore};
