use std::cmp::Reverse;

use chess_core::{Move, MoveKey, PieceType};

use crate::evaluation::piece_value;
use crate::killers::KillerTable;

// Move ordering scores
const HINT_MOVE_SCORE: i32 = 1_000_000;    // Transposition or carried-over best move
const CAPTURE_SCORE_BASE: i32 = 100_000;   // Base score for captures
const KILLER_MOVE_SCORE: i32 = 90_000;     // Newest killer; the older one scores one step lower
const PROMOTION_SCORE: i32 = 80_000;       // Quiet promotions, plus the promoted piece's value
const CASTLE_SCORE: i32 = 70_000;

// Most Valuable Victim - Least Valuable Attacker
pub fn mvv_lva_score(victim: PieceType, attacker: PieceType) -> i32 {
    piece_value(victim) * 10 - piece_value(attacker)
}

// Scores a move for ordering purposes; higher is searched first
pub fn score_move(mv: &Move, hint: Option<&MoveKey>, killers: [Option<MoveKey>; 2]) -> i32 {
    let key = mv.key();
    if hint == Some(&key) {
        return HINT_MOVE_SCORE;
    }

    if mv.is_capture() {
        let victim = mv.captured.unwrap_or(PieceType::Pawn);
        let promotion = mv.promotion.map_or(0, piece_value);
        return CAPTURE_SCORE_BASE + mvv_lva_score(victim, mv.piece.piece_type) + promotion;
    }

    if let Some(rank) = killers.iter().position(|slot| *slot == Some(key)) {
        return KILLER_MOVE_SCORE - rank as i32;
    }

    if let Some(promotion) = mv.promotion {
        return PROMOTION_SCORE + piece_value(promotion);
    }

    if mv.is_castle() {
        return CASTLE_SCORE;
    }

    0
}

/// Sorts moves in place, best candidates first. Moves that score the same
/// keep their generation order.
pub fn order_moves(moves: &mut [Move], hint: Option<&MoveKey>, killers: &KillerTable, ply: usize) {
    let slots = killers.get(ply);
    moves.sort_by_cached_key(|mv| Reverse(score_move(mv, hint, slots)));
}

/// Orders captures and promotions for quiescence search.
pub fn order_tactical(moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| Reverse(score_move(mv, None, [None, None])));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Board;

    fn key(text: &str) -> MoveKey {
        MoveKey::parse(text).unwrap()
    }

    fn coords(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|mv| mv.to_coordinate()).collect()
    }

    #[test]
    fn most_valuable_victim_first() {
        assert!(mvv_lva_score(PieceType::Queen, PieceType::Queen) > mvv_lva_score(PieceType::Rook, PieceType::Pawn));
        assert!(mvv_lva_score(PieceType::Rook, PieceType::Pawn) > mvv_lva_score(PieceType::Rook, PieceType::Queen));
    }

    #[test]
    fn pawn_takes_knight_before_queen_takes_bishop() {
        assert!(mvv_lva_score(PieceType::Knight, PieceType::Pawn) > mvv_lva_score(PieceType::Bishop, PieceType::Queen));
        assert_eq!(mvv_lva_score(PieceType::Knight, PieceType::Pawn), 3100);
    }

    #[test]
    fn hint_then_captures_then_killers() {
        // White knight on d4 can take a rook on c6 or a pawn on e6.
        let board = Board::from_fen("4k3/8/2r1p3/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let mut moves = board.legal_moves();

        let mut killers = KillerTable::new();
        killers.record(0, key("e1d2"));
        killers.record(0, key("d4b3"));

        order_moves(&mut moves, Some(&key("e1f1")), &killers, 0);
        assert_eq!(&coords(&moves)[..5], ["e1f1", "d4c6", "d4e6", "d4b3", "e1d2"]);
    }

    #[test]
    fn promotions_and_castling_ahead_of_quiet_moves() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut moves = board.legal_moves();
        order_moves(&mut moves, None, &KillerTable::new(), 0);
        assert_eq!(&coords(&moves)[..5], ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "e1g1"]);
    }
}
