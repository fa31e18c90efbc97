//! Static board evaluation

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use super::board::{Board, Player};

/// Position score from one player's point of view
///
/// Ordered `Loss < Value(_) < Win`, so an elimination dominates any cell
/// count in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Score {
    /// Every charged cell belongs to the opponent
    Loss,
    /// Own cells minus opponent cells
    Value(i32),
    /// Every charged cell belongs to the player
    Win,
}

impl Score {
    pub fn is_decisive(self) -> bool {
        !matches!(self, Score::Value(_))
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::Loss => Score::Win,
            Score::Value(v) => Score::Value(-v),
            Score::Win => Score::Loss,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Loss => write!(f, "-inf"),
            Score::Value(v) => write!(f, "{v}"),
            Score::Win => write!(f, "+inf"),
        }
    }
}

/// Score `board` for `player`: owned cells minus opponent cells, or
/// `Win`/`Loss` once one side owns every charged cell. A clear board is
/// `Value(0)`.
pub fn evaluate(board: &Board, player: Player) -> Score {
    match board.single_owner() {
        Some(owner) if owner == player => Score::Win,
        Some(_) => Score::Loss,
        None => {
            let own = board.count_owned(player) as i32;
            let theirs = board.count_owned(player.opponent()) as i32;
            Score::Value(own - theirs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::board_strategy;
    use proptest::prelude::*;

    #[test]
    fn test_cell_difference() {
        let board = Board::from_rows(&[vec![1, 3, 0], vec![-1, 0, 2]]).unwrap();
        assert_eq!(evaluate(&board, Player::One), Score::Value(2));
        assert_eq!(evaluate(&board, Player::Two), Score::Value(-2));
    }

    #[test]
    fn test_elimination_is_infinite() {
        let board = Board::from_rows(&[vec![0, 2], vec![1, 0]]).unwrap();
        assert_eq!(evaluate(&board, Player::One), Score::Win);
        assert_eq!(evaluate(&board, Player::Two), Score::Loss);
    }

    #[test]
    fn test_clear_board_is_even() {
        let board = Board::new(3, 3).unwrap();
        assert_eq!(evaluate(&board, Player::One), Score::Value(0));
    }

    #[test]
    fn test_ordering() {
        assert!(Score::Loss < Score::Value(i32::MIN));
        assert!(Score::Value(i32::MAX) < Score::Win);
        assert!(Score::Value(-1) < Score::Value(3));
        assert_eq!(-Score::Win, Score::Loss);
        assert!(Score::Win.is_decisive());
    }

    proptest! {
        #[test]
        fn prop_perspective_antisymmetry(board in board_strategy(3)) {
            let one = evaluate(&board, Player::One);
            let two = evaluate(&board, Player::Two);
            prop_assert_eq!(one, -two);
        }
    }
}
