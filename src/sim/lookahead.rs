//! Move simulation for search lookahead
//!
//! Search rates moves with a cheaper cascade than the gameplay engine: after
//! the piece is placed, a cell at its threshold empties and hands one unit to
//! each neighbor, and any neighbor that reaches its own threshold fires
//! immediately, depth first, before the remaining neighbors are touched.
//! Colliding fronts are not annihilated. Once the mover owns every charged
//! cell no new cell fires; open distributions still complete.
//!
//! [`LookaheadRule::Authoritative`] swaps this for the gameplay engine.

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Player, Pos};
use super::propagation::apply_overflow;
use super::snapshot::DiscardSnapshots;
use crate::error::{Error, Result};

/// Which propagation search uses to simulate a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookaheadRule {
    /// Depth-first cascade without the collision rule
    #[default]
    Simplified,
    /// Same step semantics as gameplay
    Authoritative,
}

impl LookaheadRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookaheadRule::Simplified => "simplified",
            LookaheadRule::Authoritative => "authoritative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simplified" | "simple" => Some(LookaheadRule::Simplified),
            "authoritative" | "exact" => Some(LookaheadRule::Authoritative),
            _ => None,
        }
    }
}

/// Place a piece for `player` and settle the board under `rule`
pub fn play(board: &mut Board, pos: Pos, player: Player, rule: LookaheadRule) -> Result<()> {
    board.place(pos, player)?;
    match rule {
        LookaheadRule::Simplified => cascade(board, pos, player).map(|_| ()),
        LookaheadRule::Authoritative => apply_overflow(board, &mut DiscardSnapshots).map(|_| ()),
    }
}

/// Maximum number of cells a single cascade may fire
pub fn firing_limit(board: &Board) -> usize {
    (board.cell_count().pow(2) * 4).max(64)
}

/// A fired cell and how far through its neighbors the cascade has got
struct Frame {
    neighbors: Vec<Pos>,
    next: usize,
}

/// Depth-first cascade from `origin`. Returns the number of cells fired.
pub fn cascade(board: &mut Board, origin: Pos, player: Player) -> Result<usize> {
    if !board.is_overflowing(origin) {
        return Ok(0);
    }
    let limit = firing_limit(board);
    let mut fired = 1;
    board.set_cell(origin, Cell::Empty);
    let mut stack = vec![Frame {
        neighbors: board.neighbors(origin).collect(),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&pos) = frame.neighbors.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        board.add_charge(pos, player);
        if !board.is_overflowing(pos) || board.single_owner() == Some(player) {
            continue;
        }
        if fired == limit {
            return Err(Error::PropagationRunaway { steps: fired, limit });
        }
        fired += 1;
        board.set_cell(pos, Cell::Empty);
        stack.push(Frame {
            neighbors: board.neighbors(pos).collect(),
            next: 0,
        });
    }

    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[i32]]) -> Board {
        Board::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_quiet_move_only_adds_charge() {
        let mut b = board(&[&[1, 0], &[0, -1]]);
        play(&mut b, Pos::new(0, 1), Player::One, LookaheadRule::Simplified).unwrap();
        assert_eq!(b.to_rows(), vec![vec![1, 1], vec![0, -1]]);
    }

    #[test]
    fn test_corner_burst() {
        let mut b = board(&[&[2, 0], &[0, 0]]);
        play(&mut b, Pos::new(0, 0), Player::One, LookaheadRule::Simplified).unwrap();
        assert_eq!(b.to_rows(), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_depth_first_chain() {
        let mut b = board(&[&[1, 2, -1], &[0, 0, 0]]);
        b.place(Pos::new(0, 0), Player::One).unwrap();
        let fired = cascade(&mut b, Pos::new(0, 0), Player::One).unwrap();
        assert_eq!(fired, 2);
        assert_eq!(b.to_rows(), vec![vec![1, 0, 2], vec![1, 1, 0]]);
    }

    #[test]
    fn test_diverges_from_gameplay_on_collisions() {
        let start = board(&[&[1, -2], &[0, 0]]);

        let mut simplified = start.clone();
        play(&mut simplified, Pos::new(0, 0), Player::One, LookaheadRule::Simplified).unwrap();
        assert_eq!(simplified.to_rows(), vec![vec![0, 3], vec![1, 0]]);

        let mut exact = start;
        play(&mut exact, Pos::new(0, 0), Player::One, LookaheadRule::Authoritative).unwrap();
        assert_eq!(exact.to_rows(), vec![vec![-1, 1], vec![1, -1]]);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut b = board(&[&[1, 0], &[0, -1]]);
        let err = play(&mut b, Pos::new(1, 1), Player::One, LookaheadRule::Simplified).unwrap_err();
        assert!(matches!(err, Error::InvalidMove { .. }));
        assert_eq!(b.to_rows(), vec![vec![1, 0], vec![0, -1]]);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(LookaheadRule::from_str("Exact"), Some(LookaheadRule::Authoritative));
        assert_eq!(LookaheadRule::Simplified.as_str(), "simplified");
        assert_eq!(LookaheadRule::from_str("fast"), None);
    }
}
