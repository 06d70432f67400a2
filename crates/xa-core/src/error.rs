//! Error types for the core model.

/// Errors raised by the core model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The effect tick ran for a character with no queued action.
    #[error("character has no pending action")]
    NoPendingAction,

    /// The map text had no grid rows.
    #[error("map is empty")]
    EmptyMap,

    /// The first map line is not a valid 1-based `row col` pair.
    #[error("bad starting position line: {0:?}")]
    BadStartingPosition(String),

    /// The starting position does not land on a room.
    #[error("starting position ({row}, {col}) is not a room")]
    StartNotRoom {
        /// Zero-based row.
        row: i32,
        /// Zero-based column.
        col: i32,
    },

    /// A grid symbol is not one of the known cells.
    #[error("unknown cell '{symbol}' at line {line}")]
    UnknownCell {
        /// The offending character.
        symbol: char,
        /// 1-based line in the map text.
        line: usize,
    },

    /// A grid row is wider or narrower than the first one.
    #[error("map rows have uneven widths (line {line})")]
    RaggedRow {
        /// 1-based line in the map text.
        line: usize,
    },
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
