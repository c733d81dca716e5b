use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::{Board, Color, DrawReason, Game, GameOutcome};
use chess_engine::{ChessAI, SearchConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcade-chess")]
#[command(about = "Lets the engine play itself from a position", long_about = None)]
struct Args {
    /// Starting position in FEN, defaults to the standard start
    #[arg(short, long)]
    fen: Option<String>,

    /// JSON search configuration (camelCase fields, missing ones use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for creative move selection
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of plies to play
    #[arg(short, long, default_value = "40")]
    plies: usize,
}

fn load_config(path: Option<&PathBuf>) -> Result<SearchConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config =
                SearchConfig::from_json(&text).with_context(|| format!("loading {}", path.display()))?;
            log::info!("search config from {}: depth {}, {} ms", path.display(), config.depth, config.time_limit_ms);
            Ok(config)
        }
        None => {
            log::debug!("no config file, using defaults");
            Ok(SearchConfig::default())
        }
    }
}

fn describe(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Checkmate { winner: Color::White } => "1-0, White mates".to_string(),
        GameOutcome::Checkmate { winner: Color::Black } => "0-1, Black mates".to_string(),
        GameOutcome::Stalemate => "1/2-1/2, stalemate".to_string(),
        GameOutcome::Draw(reason) => {
            let why = match reason {
                DrawReason::FiftyMove => "fifty-move rule",
                DrawReason::ThreefoldRepetition => "threefold repetition",
                DrawReason::InsufficientMaterial => "insufficient material",
                DrawReason::MoveLimit => "move limit",
            };
            format!("1/2-1/2, {}", why)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let board = match &args.fen {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::new(),
    };
    board.validate()?;

    let ai = match args.seed {
        Some(seed) => ChessAI::with_seed(config, seed),
        None => ChessAI::with_config(config),
    };
    let mut ai = ai.persistent_table(true);
    let mut game = Game::new(board);

    println!("Position: {}", game.board().to_fen());

    for ply in 1..=args.plies {
        if game.is_over() {
            break;
        }
        let report = ai.get_move(game.board());
        let mv = match report.chosen_move {
            Some(mv) => mv,
            None => break,
        };
        let note = if report.chosen_move != report.best_move { " *" } else { "" };
        println!(
            "{:>3}. {}{}  score {} depth {}/{} nodes {} {:?}",
            ply, mv, note, report.score, report.depth, report.target_depth, report.nodes, report.elapsed
        );
        game.play(mv)?;
    }

    match game.outcome() {
        Some(outcome) => {
            log::info!("game over after {} plies", game.moves().len());
            println!("Result: {}", describe(outcome))
        }
        None => println!("Stopped after {} plies at {}", game.moves().len(), game.board().to_fen()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("arcade-chess-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"depth": 2, "timeLimitMs": 750}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.time_limit_ms, 750);
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), SearchConfig::default());
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let path = std::env::temp_dir().join("arcade-chess-no-such-config.json");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn outcomes_read_as_results() {
        assert_eq!(describe(GameOutcome::Checkmate { winner: Color::Black }), "0-1, Black mates");
        assert_eq!(describe(GameOutcome::Draw(DrawReason::FiftyMove)), "1/2-1/2, fifty-move rule");
    }
}
