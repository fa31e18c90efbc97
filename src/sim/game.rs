//! Single-move game layer
//!
//! Wraps a board with the player to move, the move history used for undo and
//! the frame queue a renderer replays after each move.

use serde::{Deserialize, Serialize};

use super::board::{Board, Player, Pos};
use super::propagation::apply_overflow;
use super::snapshot::{Snapshot, SnapshotQueue};
use crate::error::{Error, Result};

/// What a completed move did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub player: Player,
    pub pos: Pos,
    /// Propagation steps (one queued frame per step)
    pub steps: usize,
    /// Winner after the move settled, if any
    pub winner: Option<Player>,
}

/// A game in progress
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Player,
    turn: u32,
    history: Vec<(Board, Player, u32)>,
    frames: SnapshotQueue,
}

impl Game {
    /// Fresh game on the opening position, player one to move
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::from_board(Board::starting(rows, cols)?, Player::One))
    }

    /// Continue from an arbitrary position
    pub fn from_board(board: Board, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            turn: 0,
            history: Vec::new(),
            frames: SnapshotQueue::new(),
        }
    }

    /// Deep copy of the current board
    pub fn board(&self) -> Board {
        self.board.clone()
    }

    /// Borrow the current board without copying
    pub fn board_ref(&self) -> &Board {
        &self.board
    }

    /// Replace the board, e.g. with a position popped from an external
    /// history. Pending frames are discarded.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.frames.clear();
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Moves played so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Winner once a move has been made and one player owns every charged cell
    pub fn winner(&self) -> Option<Player> {
        if self.turn == 0 {
            return None;
        }
        self.board.single_owner()
    }

    pub fn is_legal(&self, pos: Pos) -> bool {
        self.winner().is_none() && self.board.is_legal_move(pos, self.to_move)
    }

    /// Play `pos` for the player to move and settle the board.
    /// A move that fails, whether illegal or runaway, leaves the game untouched.
    pub fn play(&mut self, pos: Pos) -> Result<MoveReport> {
        let player = self.to_move;
        if !self.is_legal(pos) {
            return Err(Error::InvalidMove { pos, player });
        }

        let before = self.board.clone();
        let queued = self.frames.len();
        let settled = self
            .board
            .place(pos, player)
            .and_then(|()| apply_overflow(&mut self.board, &mut self.frames));
        let steps = match settled {
            Ok(steps) => steps,
            Err(err) => {
                self.board = before;
                self.frames.truncate(queued);
                return Err(err);
            }
        };
        self.history.push((before, player, self.turn));
        self.turn += 1;
        self.to_move = player.opponent();

        let report = MoveReport {
            player,
            pos,
            steps,
            winner: self.winner(),
        };
        log::debug!("Turn {}: {player} played {pos}, {steps} overflow steps", self.turn);
        Ok(report)
    }

    /// Restore the position before the last move
    pub fn undo(&mut self) -> Result<()> {
        let (board, player, turn) = self
            .history
            .pop()
            .ok_or(Error::EmptyContainer("move history"))?;
        self.board = board;
        self.to_move = player;
        self.turn = turn;
        self.frames.clear();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Next animation frame from the last move
    pub fn next_frame(&mut self) -> Result<Snapshot> {
        self.frames.dequeue()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frames_mut(&mut self) -> &mut SnapshotQueue {
        &mut self.frames
    }
}
