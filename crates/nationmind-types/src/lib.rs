//! Shared type definitions for the Nation-Mind game backend.
//!
//! This crate is the single source of truth for the entities exchanged
//! between the database layer, the game logic and the HTTP API. Types
//! flow downstream to `TypeScript` via `ts-rs` for the Next.js frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Typed row-id wrappers for every entity
//! - [`enums`] -- Personality, relation status and action kinds
//! - [`structs`] -- Entities plus their create/patch payloads
//! - [`actions`] -- Game endpoint request/response types

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionRequest, GameState};
pub use enums::{ActionKind, ParseEnumError, Personality, RelationStatus};
pub use ids::{EventId, NationId, RelationId, TurnId};
pub use structs::{
    DEFAULT_GOLD, DEFAULT_IMPORTANCE, DEFAULT_POWER, DEFAULT_TERRITORIES, DEFAULT_TROOPS, Event,
    EventSummary, Nation, NationPatch, NationSummary, NewEvent, NewNation, NewRelation, Relation,
    RelationPatch, Turn, WorldState,
};
