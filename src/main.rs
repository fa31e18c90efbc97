//! Overflow Grid entry point
//!
//! Headless bot-versus-bot runner. Usage: `overflow-grid [settings.json]`.
//! Set `RUST_LOG=debug` to see every move, `trace` for every overflow frame.

use std::process::ExitCode;

use overflow_grid::Settings;
use overflow_grid::session::play_match;

fn main() -> ExitCode {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("No settings file given, using defaults");
            Settings::default()
        }
    };

    match play_match(&settings) {
        Ok(report) => {
            print!("{}", report.final_board);
            match report.end.winner() {
                Some(winner) => println!("{winner} wins after {} turns", report.turns),
                None => println!("Draw after {} turns", report.turns),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if err.is_fatal() {
                log::error!("Engine fault: {err}");
            } else {
                log::error!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}
