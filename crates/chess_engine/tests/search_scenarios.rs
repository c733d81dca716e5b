// End-to-end search scenarios on known positions.

use chess_core::{Board, Game, PieceType};
use chess_engine::config::{CreativityConfig, ExtensionConfig};
use chess_engine::{evaluate_position, search, ChessAI, SearchConfig, TranspositionTable, MATE_SCORE, MAX_QUIESCENCE_PLY};

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

fn config(depth: u8) -> SearchConfig {
    SearchConfig::default().with_depth(depth).with_time_limit_ms(60_000)
}

// No extensions beyond `depth`.
fn flat_config(depth: u8) -> SearchConfig {
    SearchConfig {
        extensions: ExtensionConfig { max_depth: depth, ..ExtensionConfig::default() },
        ..config(depth)
    }
}

#[test]
fn king_takes_the_loose_pawn() {
    let b = board("8/6p1/8/3k3p/3P4/8/6PP/5K2 b - - 0 1");
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &config(3), &mut tt, None);
    assert_eq!(report.best_move.unwrap().to_coordinate(), "d5d4");
}

#[test]
fn finds_back_rank_mate() {
    let b = board("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1");
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &config(3), &mut tt, None);
    assert_eq!(report.best_move.unwrap().to_coordinate(), "e1e8");
    assert!(report.score >= MATE_SCORE - 10, "score {}", report.score);
    // Mate was found on the first iteration, no need to go deeper.
    assert_eq!(report.depth, 1);
}

#[test]
fn fifty_move_position_scores_zero() {
    let b = board("4k3/8/8/8/8/8/R7/4K3 w - - 100 90");
    assert_eq!(evaluate_position(&b), 0);
}

#[test]
fn bare_bishop_is_a_forced_draw() {
    let b = board("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1");
    assert_eq!(evaluate_position(&b), 0);

    let mut tt = TranspositionTable::new(1000);
    let report = search(&b, &config(2), &mut tt, None);
    assert!(report.forced_draw);
    assert_eq!(report.score, 0);
    assert!(report.best_move.is_some());
}

#[test]
fn opening_move_develops() {
    let b = Board::new();
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &config(2), &mut tt, None);
    let mv = report.best_move.unwrap();
    let central_pawn = mv.piece.piece_type == PieceType::Pawn && (3..=6).contains(&mv.from.file);
    assert!(
        mv.piece.piece_type == PieceType::Knight || central_pawn,
        "unexpected opening move {}",
        mv
    );
}

#[test]
fn exhausted_time_falls_back_to_first_legal_move() {
    let b = Board::new();
    let mut tt = TranspositionTable::new(1000);
    let report = search(&b, &SearchConfig::default().with_time_limit_ms(0), &mut tt, None);
    assert_eq!(report.depth, 0);
    assert_eq!(report.best_move, b.legal_moves().first().copied());
    assert!(report.candidates.is_empty());
}

#[test]
fn deadline_keeps_the_last_completed_iteration() {
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &flat_config(8).with_time_limit_ms(1000), &mut tt, None);

    assert_eq!(report.target_depth, 8);
    assert!(report.depth >= 1 && report.depth < report.target_depth, "depth {}", report.depth);
    assert_eq!(report.iterations.len(), report.depth as usize);

    let last = report.iterations.last().unwrap();
    assert_eq!(last.depth, report.depth);
    assert_eq!(report.best_move, last.best_move);
    assert_eq!(report.score, last.score);

    // Candidates belong to the completed iteration, not the interrupted one.
    assert_eq!(report.candidates.len(), b.legal_moves().len());
    assert!(report.candidates.iter().all(|c| !c.aborted));
    assert_eq!(report.candidates.iter().map(|c| c.score).max(), Some(report.score));
}

#[test]
fn selective_depth_is_bounded() {
    let b = board("r1b1k2r/ppp2ppp/2n5/3qp3/1b1PP1n1/2N2N2/PPP2PPP/R1BQKB1R w KQkq - 0 1");
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &flat_config(2), &mut tt, None);
    assert_eq!(report.target_depth, 2);
    assert!(report.seldepth <= report.target_depth + MAX_QUIESCENCE_PLY);
}

#[test]
fn iterations_never_regress_below_a_candidate() {
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut tt = TranspositionTable::new(100_000);
    let report = search(&b, &flat_config(2), &mut tt, None);
    let best = report.best_move.unwrap();
    for candidate in &report.candidates {
        assert!(candidate.score <= report.score, "{} outscored {}", candidate.mv, best);
    }
    assert_eq!(report.iterations.len(), report.depth as usize);
}

#[test]
fn creative_engine_plays_legal_moves_to_the_end() {
    let cfg = SearchConfig {
        creativity: CreativityConfig { enabled: true, ..CreativityConfig::default() },
        ..SearchConfig::default().with_depth(1)
    };
    let mut ai = ChessAI::with_seed(cfg, 11).persistent_table(true);
    let mut game = Game::default().with_move_limit(12);

    while !game.is_over() {
        let report = ai.get_move(game.board());
        assert!(ai.is_current(&report));
        let mv = report.chosen_move.expect("a move while the game is running");
        let candidate = report.candidates.iter().find(|c| c.mv == mv);
        if let (Some(candidate), Some(best)) = (candidate, report.best_move) {
            if mv != best {
                assert!(report.score - candidate.score <= CreativityConfig::default().threshold_centipawns);
            }
        }
        game.play(mv).unwrap();
    }
    assert!(game.outcome().is_some());
}
