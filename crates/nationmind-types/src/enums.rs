//! Enumeration types for the Nation-Mind game.
//!
//! Every enum here is persisted as lowercase text in `PostgreSQL` and
//! travels as the same lowercase string over JSON. [`as_str`] and
//! [`FromStr`] are the single mapping used by both the database layer and
//! the request parsers.
//!
//! [`as_str`]: Personality::as_str

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A string did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// Which enum was being parsed (e.g. `personality`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// Behavioral profile of a nation's (future) AI agent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Personality {
    /// Prefers war and conquest.
    Aggressive,
    /// Prefers alliances and negotiation.
    Diplomatic,
    /// Prefers fortification and holding territory.
    Defensive,
    /// Prefers growth in territory and influence.
    Expansionist,
    /// No strong preference.
    #[default]
    Neutral,
}

impl Personality {
    /// Every personality in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Aggressive,
        Self::Diplomatic,
        Self::Defensive,
        Self::Expansionist,
        Self::Neutral,
    ];

    /// The lowercase name stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Diplomatic => "diplomatic",
            Self::Defensive => "defensive",
            Self::Expansionist => "expansionist",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Personality {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("personality", s))
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Relation status
// ---------------------------------------------------------------------------

/// Diplomatic status between two nations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RelationStatus {
    /// Formal alliance.
    Allied,
    /// Open war.
    War,
    /// No formal relationship.
    #[default]
    Neutral,
    /// Trade agreement in force.
    TradeAgreement,
}

impl RelationStatus {
    /// Every status in declaration order.
    pub const ALL: [Self; 4] = [Self::Allied, Self::War, Self::Neutral, Self::TradeAgreement];

    /// The lowercase name stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allied => "allied",
            Self::War => "war",
            Self::Neutral => "neutral",
            Self::TradeAgreement => "trade_agreement",
        }
    }
}

impl FromStr for RelationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("relation status", s))
    }
}

impl fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// An action a nation can submit through `POST /api/game/action`.
///
/// Only [`Attack`](Self::Attack), [`Alliance`](Self::Alliance) and
/// [`Recruit`](Self::Recruit) have resolvers. The remaining kinds are
/// accepted by the parser but rejected at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Attack another nation.
    Attack,
    /// Propose (and immediately form) an alliance.
    Alliance,
    /// Trade with another nation. Reserved.
    Trade,
    /// Move troops. Reserved.
    MoveTroops,
    /// Spend gold on troops.
    Recruit,
    /// Build infrastructure. Reserved.
    Build,
}

impl ActionKind {
    /// Every action kind in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::Alliance,
        Self::Trade,
        Self::MoveTroops,
        Self::Recruit,
        Self::Build,
    ];

    /// The wire name of the action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Alliance => "alliance",
            Self::Trade => "trade",
            Self::MoveTroops => "move_troops",
            Self::Recruit => "recruit",
            Self::Build => "build",
        }
    }

    /// Whether the resolver implements this action.
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Attack | Self::Alliance | Self::Recruit)
    }
}

impl FromStr for ActionKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("action type", s))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
