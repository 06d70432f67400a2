//! Error types for the session engine.

use xa_core::{CoreError, PlayerId};

/// Errors that can occur while running a session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A player with this id is already in the context.
    #[error("player already present: {0}")]
    DuplicatePlayer(PlayerId),

    /// The context has reached its capacity.
    #[error("context is full ({max} players)")]
    ContextFull {
        /// Capacity of the context.
        max: usize,
    },

    /// The context does not take new connections, e.g. a running game.
    #[error("context is not accepting players")]
    NotAcceptingPlayers,

    /// No player with this id is in the context.
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// An error from the core model, such as an invalid map.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
