//! Bot-versus-bot matches
//!
//! Drives a [`Game`] turn by turn the way the interactive front end does:
//! ask the seat's bot for a move, play it, replay the frames, check for a
//! winner, switch seats.

use serde::{Deserialize, Serialize};

use crate::bot::{self, Bot};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::sim::{Board, Game, Player};

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEnd {
    /// One player owns every charged cell
    Elimination(Player),
    /// The player to move had no move, or its bot proposed an illegal one
    Forfeit { loser: Player },
    /// Turn limit reached
    Draw,
}

impl MatchEnd {
    pub fn winner(&self) -> Option<Player> {
        match *self {
            MatchEnd::Elimination(p) => Some(p),
            MatchEnd::Forfeit { loser } => Some(loser.opponent()),
            MatchEnd::Draw => None,
        }
    }
}

/// Summary of a finished match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub end: MatchEnd,
    pub turns: u32,
    /// Overflow steps across all moves
    pub total_steps: usize,
    pub final_board: Board,
}

/// Play a full match with the seats described by `settings`
pub fn play_match(settings: &Settings) -> Result<MatchReport> {
    settings.validate()?;
    let mut bots = [
        bot::from_settings(settings, Player::One),
        bot::from_settings(settings, Player::Two),
    ];
    let game = Game::new(settings.rows, settings.cols)?;
    log::info!(
        "Match on {}x{}: {} vs {}",
        settings.rows,
        settings.cols,
        bots[0].name(),
        bots[1].name()
    );
    run(game, &mut bots, settings.max_turns)
}

/// Play `game` to completion with one bot per seat
pub fn run(mut game: Game, bots: &mut [Box<dyn Bot>; 2], max_turns: u32) -> Result<MatchReport> {
    let mut total_steps = 0;

    let end = loop {
        if let Some(winner) = game.winner() {
            break MatchEnd::Elimination(winner);
        }
        if game.turn() >= max_turns {
            break MatchEnd::Draw;
        }

        let player = game.to_move();
        let pos = match bots[player.index()].choose(game.board_ref(), player) {
            Ok(pos) => pos,
            Err(Error::NoLegalMove(_)) => {
                log::warn!("{player} has no legal move and forfeits");
                break MatchEnd::Forfeit { loser: player };
            }
            Err(err) => return Err(err),
        };

        let report = match game.play(pos) {
            Ok(report) => report,
            Err(Error::InvalidMove { .. }) => {
                log::warn!("{player} chose illegal move {pos} and forfeits");
                break MatchEnd::Forfeit { loser: player };
            }
            Err(err) => return Err(err),
        };
        total_steps += report.steps;

        for (i, frame) in game.frames_mut().drain().enumerate() {
            log::trace!("Frame {}/{}:\n{}", i + 1, report.steps, frame.board());
        }
    };

    log::info!("Match over after {} turns: {:?}", game.turn(), end);
    Ok(MatchReport {
        end,
        turns: game.turn(),
        total_steps,
        final_board: game.board(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::RandomBot;
    use crate::settings::PlayerKind;
    use crate::sim::Pos;

    /// Always proposes the same cell
    struct Stubborn(Pos);

    impl Bot for Stubborn {
        fn name(&self) -> &'static str {
            "stubborn"
        }

        fn choose(&mut self, _board: &Board, _player: Player) -> crate::error::Result<Pos> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_random_match_finishes() {
        let settings = Settings {
            rows: 3,
            cols: 3,
            players: [PlayerKind::Random, PlayerKind::Random],
            seed: 9,
            max_turns: 60,
            ..Settings::default()
        };
        let report = play_match(&settings).unwrap();
        assert!(report.turns <= 60);
        if let MatchEnd::Elimination(winner) = report.end {
            assert_eq!(report.final_board.single_owner(), Some(winner));
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let settings = Settings {
            rows: 3,
            cols: 4,
            players: [PlayerKind::Random, PlayerKind::Random],
            seed: 1234,
            max_turns: 40,
            ..Settings::default()
        };
        let a = play_match(&settings).unwrap();
        let b = play_match(&settings).unwrap();
        assert_eq!(a.end, b.end);
        assert_eq!(a.turns, b.turns);
        assert_eq!(a.final_board, b.final_board);
    }

    #[test]
    fn test_illegal_choice_forfeits() {
        let game = Game::new(3, 3).unwrap();
        let mut bots: [Box<dyn Bot>; 2] = [
            Box::new(Stubborn(Pos::new(2, 2))),
            Box::new(RandomBot::new(0)),
        ];
        let report = run(game, &mut bots, 10).unwrap();
        assert_eq!(report.end, MatchEnd::Forfeit { loser: Player::One });
        assert_eq!(report.end.winner(), Some(Player::Two));
        assert_eq!(report.turns, 0);
    }

    #[test]
    fn test_turn_limit_draws() {
        let game = Game::new(5, 6).unwrap();
        let mut bots: [Box<dyn Bot>; 2] = [Box::new(RandomBot::new(1)), Box::new(RandomBot::new(2))];
        let report = run(game, &mut bots, 2).unwrap();
        assert_eq!(report.end, MatchEnd::Draw);
        assert_eq!(report.turns, 2);
    }

    #[test]
    fn test_single_line_board_is_rejected() {
        for (rows, cols) in [(1, 2), (1, 4), (3, 1)] {
            let settings = Settings {
                rows,
                cols,
                players: [PlayerKind::Random, PlayerKind::Random],
                ..Settings::default()
            };
            let err = play_match(&settings).unwrap_err();
            assert!(matches!(err, Error::InvalidSettings(_)));
            assert!(!err.is_fatal());
        }
        assert!(matches!(Game::new(1, 4), Err(Error::InvalidBoard(_))));
    }
}
