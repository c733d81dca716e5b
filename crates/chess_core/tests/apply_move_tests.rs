// State-transition fixtures for `Board::apply_move`.

use chess_core::{Board, CastleSide, CastlingRights, Color, PieceType, Position};

fn sq(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

fn play(board: &Board, notation: &str) -> Board {
    let mv = board.find_move(notation).unwrap();
    board.apply_move(&mv)
}

#[test]
fn initial_position_state() {
    let board = Board::new();
    assert_eq!(board.castling_rights(), CastlingRights::default());
    assert_eq!(board.en_passant(), None);
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.fullmove_number(), 1);
    assert_eq!(board.current_turn(), Color::White);
}

#[test]
fn apply_move_leaves_the_source_board_untouched() {
    let board = Board::new();
    let snapshot = board;
    let _ = play(&board, "e2e4");
    assert_eq!(board, snapshot);
}

#[test]
fn double_push_sets_en_passant_target_for_one_ply() {
    let after_e4 = play(&Board::new(), "e2e4");
    assert_eq!(after_e4.en_passant(), Some(sq("e3")));
    assert_eq!(after_e4.halfmove_clock(), 0);
    assert_eq!(after_e4.fullmove_number(), 1);

    let after_nf6 = play(&after_e4, "g8f6");
    assert_eq!(after_nf6.en_passant(), None);
    assert_eq!(after_nf6.halfmove_clock(), 1);
    assert_eq!(after_nf6.fullmove_number(), 2);
}

#[test]
fn kingside_castle_moves_rook_and_clears_rights() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
    let castle = board.find_move("e1g1").unwrap();
    assert_eq!(castle.castle_side(), Some(CastleSide::King));

    let next = board.apply_move(&castle);
    assert_eq!(next.get_piece(sq("g1")).map(|p| p.piece_type), Some(PieceType::King));
    assert_eq!(next.get_piece(sq("f1")).map(|p| p.piece_type), Some(PieceType::Rook));
    assert_eq!(next.get_piece(sq("h1")), None);
    assert_eq!(next.get_piece(sq("e1")), None);

    let rights = next.castling_rights();
    assert!(!rights.white_kingside && !rights.white_queenside);
    assert!(rights.black_kingside && rights.black_queenside);
    assert_eq!(next.en_passant(), None);
    assert_eq!(next.halfmove_clock(), 4);
}

#[test]
fn queenside_castle_for_black() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 10").unwrap();
    let next = play(&board, "e8c8");
    assert_eq!(next.get_piece(sq("c8")).map(|p| p.piece_type), Some(PieceType::King));
    assert_eq!(next.get_piece(sq("d8")).map(|p| p.piece_type), Some(PieceType::Rook));
    assert_eq!(next.get_piece(sq("a8")), None);

    let rights = next.castling_rights();
    assert!(rights.white_kingside && rights.white_queenside);
    assert!(!rights.black_kingside && !rights.black_queenside);
    assert_eq!(next.fullmove_number(), 11);
    assert_eq!(next.current_turn(), Color::White);
}

#[test]
fn en_passant_capture_removes_the_passed_pawn() {
    let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 7 2").unwrap();
    let mv = board.find_move("e5d6").unwrap();
    assert!(mv.is_en_passant());
    assert_eq!(mv.captured, Some(PieceType::Pawn));

    let next = board.apply_move(&mv);
    assert_eq!(next.get_piece(sq("d5")), None);
    assert_eq!(next.get_piece(sq("e5")), None);
    assert_eq!(
        next.get_piece(sq("d6")).map(|p| (p.piece_type, p.color)),
        Some((PieceType::Pawn, Color::White))
    );
    assert_eq!(next.en_passant(), None);
    assert_eq!(next.halfmove_clock(), 0);
}

#[test]
fn rook_capture_on_home_square_revokes_victims_right() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let next = play(&board, "a1a8");

    let rights = next.castling_rights();
    assert!(!rights.black_queenside, "captured rook's side must be revoked");
    assert!(rights.black_kingside);
    assert!(!rights.white_queenside, "moving rook leaves its home square");
    assert!(rights.white_kingside);
    assert_eq!(next.halfmove_clock(), 0);
}

#[test]
fn rook_move_from_home_square_revokes_only_that_side() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    let next = play(&board, "h8h5");
    let rights = next.castling_rights();
    assert!(!rights.black_kingside);
    assert!(rights.black_queenside && rights.white_kingside && rights.white_queenside);
}

#[test]
fn promotion_substitutes_the_chosen_piece() {
    let board = Board::from_fen("1r5k/P7/8/8/8/8/8/K7 w - - 5 30").unwrap();
    let next = play(&board, "a7b8n");
    assert_eq!(
        next.get_piece(sq("b8")).map(|p| (p.piece_type, p.color)),
        Some((PieceType::Knight, Color::White))
    );
    assert_eq!(next.get_piece(sq("a7")), None);
    assert_eq!(next.halfmove_clock(), 0);
}
