// Pseudo-legal and legal move generation over the mailbox board.
//
// Legality is established by brute force: every pseudo-legal move is applied
// and discarded if it leaves the mover's king attacked. There is no pin
// detection.

use crate::{
    board::{king_offsets, knight_offsets, DIAGONALS, ORTHOGONALS},
    error::{ChessError, ChessResult},
    moves::{CastleSide, MoveKey},
    piece::{Color, PieceType},
    Board, Move, Piece, Position,
};

/// Pseudo-legal moves for the piece on `pos`. Empty if the square is empty.
pub fn pseudo_moves(board: &Board, pos: Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(16);
    pseudo_moves_into(board, pos, &mut out);
    out
}

/// Appends the pseudo-legal moves of the piece on `pos` to `out`.
pub fn pseudo_moves_into(board: &Board, pos: Position, out: &mut Vec<Move>) {
    let piece = match board.get_piece(pos) {
        Some(p) => p,
        None => return,
    };

    match piece.piece_type {
        PieceType::Pawn => gen_pawn(board, pos, piece, out),
        PieceType::Knight => gen_steps(board, pos, piece, knight_offsets(), out),
        PieceType::Bishop => gen_slider(board, pos, piece, &DIAGONALS, out),
        PieceType::Rook => gen_slider(board, pos, piece, &ORTHOGONALS, out),
        PieceType::Queen => {
            gen_slider(board, pos, piece, &DIAGONALS, out);
            gen_slider(board, pos, piece, &ORTHOGONALS, out);
        }
        PieceType::King => {
            gen_steps(board, pos, piece, king_offsets(), out);
            gen_castles(board, pos, piece, out);
        }
    }
}

/// Target square for `piece` moving to `to`: quiet, capture, or blocked by a friend.
fn step_to(board: &Board, from: Position, to: Position, piece: Piece) -> Option<Move> {
    match board.get_piece(to) {
        None => Some(Move::quiet(from, to, piece)),
        Some(target) if target.color != piece.color => {
            Some(Move::capture(from, to, piece, target.piece_type))
        }
        Some(_) => None,
    }
}

fn push_with_promotions(mv: Move, promotion_rank: u8, out: &mut Vec<Move>) {
    if mv.to.rank == promotion_rank {
        for promotion in PieceType::PROMOTIONS {
            out.push(mv.with_promotion(promotion));
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(board: &Board, from: Position, pawn: Piece, out: &mut Vec<Move>) {
    let dir = pawn.color.pawn_direction();
    let (start_rank, promotion_rank) = match pawn.color {
        Color::White => (2, 8),
        Color::Black => (7, 1),
    };

    if let Some(one) = from.offset(0, dir) {
        if board.get_piece(one).is_none() {
            push_with_promotions(Move::quiet(from, one, pawn), promotion_rank, out);

            if from.rank == start_rank {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.get_piece(two).is_none() {
                        out.push(Move::double_push(from, two, pawn));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let to = match from.offset(df, dir) {
            Some(to) => to,
            None => continue,
        };
        match board.get_piece(to) {
            Some(target) if target.color != pawn.color => {
                let mv = Move::capture(from, to, pawn, target.piece_type);
                push_with_promotions(mv, promotion_rank, out);
            }
            None if board.en_passant() == Some(to) => {
                out.push(Move::en_passant(from, to, pawn));
            }
            _ => {}
        }
    }
}

fn gen_steps(board: &Board, from: Position, piece: Piece, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if let Some(mv) = step_to(board, from, to, piece) {
                out.push(mv);
            }
        }
    }
}

fn gen_slider(board: &Board, from: Position, piece: Piece, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(df, dr) in dirs {
        let mut current = from.offset(df, dr);
        while let Some(to) = current {
            match step_to(board, from, to, piece) {
                Some(mv) => {
                    out.push(mv);
                    if mv.is_capture() {
                        break;
                    }
                }
                None => break,
            }
            current = to.offset(df, dr);
        }
    }
}

fn gen_castles(board: &Board, from: Position, king: Piece, out: &mut Vec<Move>) {
    let color = king.color;
    let rank = color.home_rank();
    if from != (Position { file: 5, rank }) {
        return;
    }
    let rights = board.castling_rights();
    if !rights.has_any(color) {
        return;
    }
    let enemy = color.opposite();
    if board.is_square_attacked(from, enemy) {
        return;
    }

    for side in [CastleSide::King, CastleSide::Queen] {
        if !rights.has(color, side) {
            continue;
        }
        let (rook_file, _) = side.rook_files();
        if board.get_piece(Position { file: rook_file, rank }) != Some(Piece::new(PieceType::Rook, color)) {
            continue;
        }

        // Squares strictly between king and rook must be empty.
        let (lo, hi) = if rook_file < 5 { (rook_file + 1, 4) } else { (6, rook_file - 1) };
        if (lo..=hi).any(|file| board.get_piece(Position { file, rank }).is_some()) {
            continue;
        }

        // The king may not pass through or land on an attacked square.
        let target_file = side.king_target_file();
        let (lo, hi) = if target_file < 5 { (target_file, 4) } else { (6, target_file) };
        if (lo..=hi).any(|file| board.is_square_attacked(Position { file, rank }, enemy)) {
            continue;
        }

        out.push(Move::castle(from, Position { file: target_file, rank }, king, side));
    }
}

/// Pseudo-legal moves for every piece of the side to move, squares a1..h8.
pub fn all_pseudo_moves(board: &Board) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    let turn = board.current_turn();
    for (pos, piece) in board.pieces() {
        if piece.color == turn {
            pseudo_moves_into(board, pos, &mut out);
        }
    }
    out
}

/// Legal moves for the side to move.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mover = board.current_turn();
    let mut moves = all_pseudo_moves(board);
    moves.retain(|mv| !board.apply_move(mv).is_in_check(mover));
    moves
}

/// Legal moves of the piece on `pos`, for move highlighting.
pub fn legal_moves_from(board: &Board, pos: Position) -> Vec<Move> {
    match board.get_piece(pos) {
        Some(piece) if piece.color == board.current_turn() => {
            let mut moves = pseudo_moves(board, pos);
            moves.retain(|mv| !board.apply_move(mv).is_in_check(piece.color));
            moves
        }
        _ => Vec::new(),
    }
}

/// Whether `color`'s king is attacked. A board without that king is never in check.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    board.is_in_check(color)
}

/// Whether playing `mv` leaves the opponent in check.
pub fn gives_check(board: &Board, mv: &Move) -> bool {
    board.apply_move(mv).is_in_check(mv.piece.color.opposite())
}

/// Counts leaf nodes of the legal move tree to the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| perft(&board.apply_move(mv), depth - 1))
        .sum()
}

impl Board {
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(self)
    }

    /// Resolves a move descriptor to the matching legal move.
    pub fn find_legal_move(&self, key: &MoveKey) -> Option<Move> {
        legal_moves_from(self, key.from)
            .into_iter()
            .find(|mv| mv.matches(key))
    }

    /// Resolves coordinate notation (`e2e4`, `e7e8q`) to a legal move.
    pub fn find_move(&self, notation: &str) -> ChessResult<Move> {
        let key = MoveKey::parse(notation)
            .ok_or_else(|| ChessError::InvalidNotation(notation.to_string()))?;
        if self.get_piece(key.from).is_none() {
            return Err(ChessError::NoPieceAtSquare(key.from));
        }
        self.find_legal_move(&key)
            .ok_or_else(|| ChessError::IllegalMove(notation.to_string()))
    }
}
