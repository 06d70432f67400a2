//! Domain model for the Xanadu multiplayer text adventure.
//!
//! Holds the data every phase of a session shares: players and their
//! lifecycle, characters with stats and effects, the grid map, queued
//! actions and outbound messages. Session rules live in `xa-engine`.

/// Queued actions and their keys.
pub mod action;
/// Characters, classes, allegiances and the per-turn effect tick.
pub mod character;
/// Effect meters and toggles.
pub mod effects;
/// Error types for the core crate.
pub mod error;
/// Grid map, cells and room descriptions.
pub mod map;
/// Outbound messages and recipient parsing.
pub mod messaging;
/// Approximate (prefix) name matching.
pub mod names;
/// Players, lifecycle states and roster projections.
pub mod player;
/// Stat bundles and clamped stat arithmetic.
pub mod stats;

/// Re-exports of [`action::Action`], [`action::ActionKey`], and [`action::ActionKind`].
pub use action::{Action, ActionKey, ActionKind};
/// Re-exports of the character types.
pub use character::{Allegiance, Character, CharacterClass, Modifier};
/// Re-exports of [`effects::Effects`] and [`effects::Meter`].
pub use effects::{Effects, Meter};
/// Re-exports of [`error::CoreError`] and [`error::CoreResult`].
pub use error::{CoreError, CoreResult};
/// Re-exports of the map types.
pub use map::{Cell, Direction, Map, Position};
/// Re-exports of [`messaging::Message`] and [`messaging::MessageType`].
pub use messaging::{Message, MessageType};
/// Re-exports of the player types.
pub use player::{Player, PlayerId, PlayerState, PrimordialCharacter};
/// Re-exports of [`stats::Stats`] and [`stats::PartialStats`].
pub use stats::{PartialStats, Stats};
