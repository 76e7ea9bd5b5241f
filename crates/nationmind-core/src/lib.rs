//! Game rules for the Nation-Mind backend.
//!
//! Everything in this crate is pure: functions take entities by reference
//! and return either a value or a plan for the database layer to apply.
//! Nothing here touches I/O except configuration loading.
//!
//! # Modules
//!
//! - [`actions`] -- Resolves attack, alliance and recruit into an
//!   [`ActionPlan`].
//! - [`config`] -- Configuration loading from `nationmind-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`GameError`], the domain error taxonomy.
//! - [`game`] -- Starting roster, game-over rule and the game state view.
//! - [`relation`] -- Canonical pair ordering and patch merging.
//! - [`turn`] -- Turn numbering and world snapshots.

pub mod actions;
pub mod config;
pub mod error;
pub mod game;
pub mod relation;
pub mod turn;

pub use actions::{ActionPlan, RelationChange, ResourceDelta};
pub use config::{ConfigError, GameConfig, LogFormat};
pub use error::GameError;
