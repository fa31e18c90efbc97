//! Error types
//!
//! Every fallible operation in the crate returns [`Error`] through the
//! crate-wide [`Result`] alias.

use crate::sim::{Player, Pos};

/// Errors raised by the board, the propagation engine, search and settings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Move is out of bounds, on an opponent's cell, or the game is over.
    /// The board is left untouched.
    #[error("invalid move {pos} for {player}")]
    InvalidMove {
        /// Target cell.
        pos: Pos,
        /// Player attempting the move.
        player: Player,
    },

    /// Draining an empty snapshot queue or move history.
    #[error("{0} is empty")]
    EmptyContainer(&'static str),

    /// The search root has no candidate move.
    #[error("no legal move for {0}")]
    NoLegalMove(Player),

    /// Propagation did not settle within its step limit. This means the board
    /// handed to the engine was corrupt; it is a caller bug, not normal play.
    #[error("propagation ran away after {steps} steps (limit {limit})")]
    PropagationRunaway {
        /// Steps taken when the guard tripped.
        steps: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Board dimensions or encoding are malformed.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for conditions that indicate a bug rather than a recoverable state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::PropagationRunaway { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
