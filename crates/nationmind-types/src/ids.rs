//! Type-safe identifier wrappers around database row ids.
//!
//! Every table uses a `BIGSERIAL` primary key. Wrapping the raw `i64` in a
//! newtype per entity prevents passing a turn id where a nation id is
//! expected. Ids are only ever minted by `PostgreSQL`; the `From<i64>`
//! conversions exist for row decoding and tests.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around an `i64` row id with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(#[ts(type = "number")] pub i64);

        impl $name {
            /// Return the inner row id.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a nation.
    NationId
}

define_id! {
    /// Unique identifier for a turn row (not the turn number).
    TurnId
}

define_id! {
    /// Unique identifier for an event in the game log.
    EventId
}

define_id! {
    /// Unique identifier for a diplomatic relation row.
    RelationId
}
