//! Overflow Grid - a chain-reaction territory game
//!
//! Core modules:
//! - `sim`: Deterministic game core (board, overflow propagation, search)
//! - `bot`: Automated players
//! - `session`: Bot-versus-bot matches
//! - `settings`: Match configuration

pub mod bot;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{PlayerKind, Settings};

/// Game configuration constants
pub mod consts {
    /// Default board size (rows x cols)
    pub const DEFAULT_ROWS: usize = 5;
    pub const DEFAULT_COLS: usize = 6;

    /// Plies a minimax seat looks ahead by default
    pub const DEFAULT_SEARCH_DEPTH: u32 = 2;
    /// Game-tree node cap per decision
    pub const DEFAULT_NODE_BUDGET: usize = 200_000;

    /// Moves before a match is called a draw
    pub const DEFAULT_MAX_TURNS: u32 = 200;
}
