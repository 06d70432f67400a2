//! Session engine for the Xanadu multiplayer text adventure.
//!
//! A session moves between two contexts: the [`Lobby`], where players
//! name themselves and ready up, and the [`Game`], where every playing
//! player queues one action per turn and the turn resolves once all have
//! submitted. Input is handled strictly one message at a time; the
//! [`Session`] owns the active context and performs the swaps.

/// Action registry: parse, validate and perform.
pub mod actions;
/// Configuration types for sessions.
pub mod config;
/// The shared context contract and roster.
pub mod context;
/// Error types for the engine crate.
pub mod error;
/// The in-game context and turn scheduler.
pub mod game;
/// The pre-game lobby context.
pub mod lobby;
/// Top-level session orchestrator.
pub mod session;

/// Re-exports of [`actions::Validation`] and [`actions::parse_action`].
pub use actions::{Validation, parse_action};
/// Re-export of [`config::GameConfig`].
pub use config::GameConfig;
/// Re-exports of the context contract.
pub use context::{Context, NameValidation, Roster, TurnOutcome};
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-export of [`game::Game`].
pub use game::Game;
/// Re-export of [`lobby::Lobby`].
pub use lobby::Lobby;
/// Re-exports of [`session::Session`] and [`session::Phase`].
pub use session::{Phase, Session};
