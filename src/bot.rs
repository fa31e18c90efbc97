//! Automated players

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{Error, Result};
use crate::settings::{PlayerKind, Settings};
use crate::sim::{Board, Player, Pos, SearchConfig, search};

/// Something that picks a move for a player on a board
pub trait Bot {
    fn name(&self) -> &'static str;

    fn choose(&mut self, board: &Board, player: Player) -> Result<Pos>;
}

/// Minimax player
#[derive(Debug, Clone)]
pub struct MinimaxBot {
    pub config: SearchConfig,
}

impl MinimaxBot {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl Bot for MinimaxBot {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn choose(&mut self, board: &Board, player: Player) -> Result<Pos> {
        search(board, player, &self.config).map(|outcome| outcome.best_move)
    }
}

/// Uniformly random legal moves from a seeded generator
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: Pcg32,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, board: &Board, player: Player) -> Result<Pos> {
        let moves: Vec<Pos> = board.legal_moves(player).collect();
        if moves.is_empty() {
            return Err(Error::NoLegalMove(player));
        }
        Ok(moves[self.rng.random_range(0..moves.len())])
    }
}

/// Build the bot configured for `player`'s seat
pub fn from_settings(settings: &Settings, player: Player) -> Box<dyn Bot> {
    match settings.players[player.index()] {
        PlayerKind::Minimax => Box::new(MinimaxBot::new(settings.search.to_config())),
        // Seats get distinct streams so mirrored random bots don't mirror moves
        PlayerKind::Random => Box::new(RandomBot::new(
            settings.seed.wrapping_add(player.index() as u64),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bot_is_deterministic() {
        let board = Board::starting(5, 6).unwrap();
        let mut a = RandomBot::new(42);
        let mut b = RandomBot::new(42);
        for _ in 0..10 {
            assert_eq!(
                a.choose(&board, Player::One).unwrap(),
                b.choose(&board, Player::One).unwrap()
            );
        }
    }

    #[test]
    fn test_random_bot_only_plays_legal_moves() {
        let board = Board::from_rows(&[vec![1, -1], vec![-1, -1]]).unwrap();
        let mut bot = RandomBot::new(7);
        for _ in 0..20 {
            assert_eq!(bot.choose(&board, Player::One).unwrap(), Pos::new(0, 0));
        }
        let full = Board::from_rows(&[vec![-1, -1], vec![-1, -1]]).unwrap();
        assert!(matches!(
            bot.choose(&full, Player::One),
            Err(Error::NoLegalMove(Player::One))
        ));
    }

    #[test]
    fn test_minimax_bot_takes_the_win() {
        let board = Board::from_rows(&[vec![0, 0, 0], vec![0, 0, 0], vec![0, -1, 1]]).unwrap();
        let mut bot = MinimaxBot::new(SearchConfig::with_depth(2));
        assert_eq!(bot.choose(&board, Player::One).unwrap(), Pos::new(2, 2));
    }

    #[test]
    fn test_bots_from_settings() {
        let mut settings = Settings::default();
        settings.players = [PlayerKind::Random, PlayerKind::Minimax];
        assert_eq!(from_settings(&settings, Player::One).name(), "random");
        assert_eq!(from_settings(&settings, Player::Two).name(), "minimax");
    }
}
