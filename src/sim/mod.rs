//! Deterministic game core
//!
//! Everything that decides what a move does lives here. This module must be
//! pure and deterministic:
//! - Row-major iteration everywhere order matters
//! - Boards are plain values; copies never alias
//! - No rendering or platform dependencies

pub mod board;
pub mod evaluate;
pub mod game;
pub mod lookahead;
pub mod propagation;
pub mod search;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use board::{Board, Cell, Player, Pos};
pub use evaluate::{Score, evaluate};
pub use game::{Game, MoveReport};
pub use lookahead::LookaheadRule;
pub use propagation::{StepPlan, apply_overflow, plan_step};
pub use search::{GameTree, SearchConfig, SearchOutcome, choose_move, search};
pub use snapshot::{DiscardSnapshots, Snapshot, SnapshotQueue, SnapshotSink};
