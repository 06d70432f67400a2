//! Queued player actions.
//!
//! These are plain data; parsing, validation and execution live in the
//! engine's action registry.

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Stable key identifying an action component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKey {
    /// Step to a neighbouring room.
    Move,
    /// Skip the turn.
    Pass,
    /// Recover at a camp.
    Rest,
}

impl ActionKey {
    /// All keys, in registry order.
    pub const ALL: [ActionKey; 3] = [Self::Move, Self::Pass, Self::Rest];
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::Pass => write!(f, "pass"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Per-kind payload of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Step by a signed row/column offset.
    Move {
        /// Rows to move; negative is north.
        row_offset: i32,
        /// Columns to move; negative is west.
        col_offset: i32,
    },
    /// Do nothing this turn.
    Pass,
    /// Sleep at a camp, refilling exhaustion.
    Rest,
}

/// One action queued by a player for the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The acting player.
    pub actor: PlayerId,
    /// Submission time; breaks ties between equally agile actors.
    pub timestamp: i64,
    /// What the action does.
    pub kind: ActionKind,
}

impl Action {
    /// Create an action.
    pub fn new(actor: PlayerId, timestamp: i64, kind: ActionKind) -> Self {
        Self {
            actor,
            timestamp,
            kind,
        }
    }

    /// Registry key of this action's component.
    pub fn key(&self) -> ActionKey {
        match self.kind {
            ActionKind::Move { .. } => ActionKey::Move,
            ActionKind::Pass => ActionKey::Pass,
            ActionKind::Rest => ActionKey::Rest,
        }
    }

    /// Rest and ingest actions replenish meters themselves, so the per-turn
    /// exhaustion drain skips them.
    pub fn replenishes_exhaustion(&self) -> bool {
        matches!(self.kind, ActionKind::Rest)
    }
}
