use std::fmt;

use crate::{
    error::{ChessError, ChessResult},
    moves::{CastleSide, MoveType},
    piece::{Color, PieceType},
    Move, Piece, Position,
};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (-1, 2), (-2, 1),
    (1, -2), (2, -1), (-1, -2), (-2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1), (1, 0), (1, -1), (0, 1),
    (0, -1), (-1, 1), (-1, 0), (-1, -1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub(crate) fn knight_offsets() -> &'static [(i8, i8)] {
    &KNIGHT_OFFSETS
}

pub(crate) fn king_offsets() -> &'static [(i8, i8)] {
    &KING_OFFSETS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_kingside,
            (Color::White, CastleSide::Queen) => self.white_queenside,
            (Color::Black, CastleSide::King) => self.black_kingside,
            (Color::Black, CastleSide::Queen) => self.black_queenside,
        }
    }

    pub fn has_any(&self, color: Color) -> bool {
        self.has(color, CastleSide::King) || self.has(color, CastleSide::Queen)
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_kingside = false,
            (Color::White, CastleSide::Queen) => self.white_queenside = false,
            (Color::Black, CastleSide::King) => self.black_kingside = false,
            (Color::Black, CastleSide::Queen) => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::King);
        self.revoke(color, CastleSide::Queen);
    }

    pub(crate) fn bits(&self) -> u8 {
        (self.white_kingside as u8)
            | (self.white_queenside as u8) << 1
            | (self.black_kingside as u8) << 2
            | (self.black_queenside as u8) << 3
    }
}

/// Which castling side a rook home square belongs to, if any.
fn rook_home_side(pos: Position, color: Color) -> Option<CastleSide> {
    if pos.rank != color.home_rank() {
        return None;
    }
    match pos.file {
        1 => Some(CastleSide::Queen),
        8 => Some(CastleSide::King),
        _ => None,
    }
}

/// Packed identity of a position for repetition and transposition purposes:
/// piece placement, side to move, castling rights and en-passant square.
/// The move clocks are deliberately left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardKey([u8; 34]);

/// Full game state. `Board` is `Copy`: applying a move yields a new value and
/// never touches the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    current_turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.castling_rights = CastlingRights::default();
        board.setup_initial_position();
        board
    }

    /// Empty board, White to move, no castling rights.
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
            current_turn: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    fn setup_initial_position(&mut self) {
        for file in 1..=8 {
            self.put(Position { file, rank: 2 }, Piece::new(PieceType::Pawn, Color::White));
            self.put(Position { file, rank: 7 }, Piece::new(PieceType::Pawn, Color::Black));
        }

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            self.put(Position { file, rank: 1 }, Piece::new(piece_type, Color::White));
            self.put(Position { file, rank: 8 }, Piece::new(piece_type, Color::Black));
        }
    }

    fn put(&mut self, pos: Position, piece: Piece) {
        self.squares[pos.index()] = Some(piece);
    }

    /// Builder-style setters, used when reconstructing snapshots.
    pub fn with_piece(mut self, pos: Position, piece: Option<Piece>) -> Self {
        self.squares[pos.index()] = piece;
        self
    }

    pub fn with_turn(mut self, color: Color) -> Self {
        self.current_turn = color;
        self
    }

    pub fn with_castling_rights(mut self, rights: CastlingRights) -> Self {
        self.castling_rights = rights;
        self
    }

    pub fn with_en_passant(mut self, square: Option<Position>) -> Self {
        self.en_passant = square;
        self
    }

    pub fn with_clocks(mut self, halfmove_clock: u32, fullmove_number: u32) -> Self {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.index()]
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// All occupied squares, a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, sq)| sq.map(|piece| (Position::from_index(i), piece)))
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(pos, _)| pos)
    }

    pub fn key(&self) -> BoardKey {
        let mut bytes = [0u8; 34];
        for (i, pair) in self.squares.chunks(2).enumerate() {
            let lo = pair[0].map_or(0, Piece::code);
            let hi = pair[1].map_or(0, Piece::code);
            bytes[i] = lo | hi << 4;
        }
        let turn = match self.current_turn {
            Color::White => 0,
            Color::Black => 1,
        };
        bytes[32] = turn | self.castling_rights.bits() << 1;
        bytes[33] = self.en_passant.map_or(0, |sq| sq.index() as u8 + 1);
        BoardKey(bytes)
    }

    /// Whether `pos` is attacked by any piece of `by`.
    pub fn is_square_attacked(&self, pos: Position, by: Color) -> bool {
        // A pawn of `by` attacks us from one rank behind its direction of travel.
        let back = -by.pawn_direction();
        for df in [-1, 1] {
            if let Some(from) = pos.offset(df, back) {
                if self.get_piece(from) == Some(Piece::new(PieceType::Pawn, by)) {
                    return true;
                }
            }
        }

        for &(df, dr) in knight_offsets() {
            if let Some(from) = pos.offset(df, dr) {
                if self.get_piece(from) == Some(Piece::new(PieceType::Knight, by)) {
                    return true;
                }
            }
        }

        for (dirs, slider) in [(&DIAGONALS, PieceType::Bishop), (&ORTHOGONALS, PieceType::Rook)] {
            for &(df, dr) in dirs.iter() {
                let mut current = pos.offset(df, dr);
                let mut adjacent = true;
                while let Some(sq) = current {
                    if let Some(piece) = self.get_piece(sq) {
                        if piece.color == by
                            && (piece.piece_type == slider
                                || piece.piece_type == PieceType::Queen
                                || (adjacent && piece.piece_type == PieceType::King))
                        {
                            return true;
                        }
                        break;
                    }
                    adjacent = false;
                    current = sq.offset(df, dr);
                }
            }
        }

        false
    }

    /// Whether `color`'s king is attacked. A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_position(color) {
            Some(king) => self.is_square_attacked(king, color.opposite()),
            None => false,
        }
    }

    /// Pure state transition. `mv` must have been generated for this board.
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mut next = *self;
        let mover = mv.piece.color;
        let target = self.get_piece(mv.to);

        next.squares[mv.from.index()] = None;

        if mv.is_en_passant() {
            // The captured pawn sits beside the destination, on the origin rank.
            let victim = Position { file: mv.to.file, rank: mv.from.rank };
            next.squares[victim.index()] = None;
        }

        let placed = match mv.promotion {
            Some(promotion) => Piece::new(promotion, mover),
            None => mv.piece,
        };
        next.squares[mv.to.index()] = Some(placed);

        if let MoveType::Castle(side) = mv.move_type {
            let (rook_from, rook_to) = side.rook_files();
            let rank = mover.home_rank();
            let rook_home = Position { file: rook_from, rank };
            let rook = next.squares[rook_home.index()].take();
            next.squares[Position { file: rook_to, rank }.index()] = rook;
        }

        match mv.piece.piece_type {
            PieceType::King => next.castling_rights.revoke_all(mover),
            PieceType::Rook => {
                if let Some(side) = rook_home_side(mv.from, mover) {
                    next.castling_rights.revoke(mover, side);
                }
            }
            _ => {}
        }
        if let Some(captured) = target {
            if captured.piece_type == PieceType::Rook {
                if let Some(side) = rook_home_side(mv.to, captured.color) {
                    next.castling_rights.revoke(captured.color, side);
                }
            }
        }

        next.en_passant = if mv.is_double_push() {
            Position::new(mv.from.file, (mv.from.rank + mv.to.rank) / 2)
        } else {
            None
        };

        if mv.piece.piece_type == PieceType::Pawn || mv.is_capture() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }

        if mover == Color::Black {
            next.fullmove_number += 1;
        }
        next.current_turn = mover.opposite();

        next
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Lone kings, king and one minor piece against a lone king, or one
    /// bishop each standing on squares of the same color.
    pub fn has_insufficient_material(&self) -> bool {
        let mut white = Vec::with_capacity(2);
        let mut black = Vec::with_capacity(2);

        for (pos, piece) in self.pieces() {
            if piece.piece_type == PieceType::King {
                continue;
            }
            let side = match piece.color {
                Color::White => &mut white,
                Color::Black => &mut black,
            };
            side.push((pos, piece.piece_type));
            if side.len() > 1 {
                return false;
            }
        }

        match (white.as_slice(), black.as_slice()) {
            ([], []) => true,
            ([(_, piece_type)], []) | ([], [(_, piece_type)]) => piece_type.is_minor(),
            ([(white_pos, PieceType::Bishop)], [(black_pos, PieceType::Bishop)]) => {
                white_pos.is_dark() == black_pos.is_dark()
            }
            _ => false,
        }
    }

    /// Structural sanity check for externally supplied snapshots: one king per
    /// side, no pawns on the back ranks, and the side that just moved is not
    /// left in check.
    pub fn validate(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .pieces()
                .filter(|(_, p)| p.piece_type == PieceType::King && p.color == color)
                .count();
            if kings != 1 {
                return Err(ChessError::InvalidPosition(format!(
                    "expected one {:?} king, found {}",
                    color, kings
                )));
            }
        }
        if let Some((pos, _)) = self
            .pieces()
            .find(|(pos, p)| p.piece_type == PieceType::Pawn && (pos.rank == 1 || pos.rank == 8))
        {
            return Err(ChessError::InvalidPosition(format!("pawn on back rank at {}", pos)));
        }
        if self.is_in_check(self.current_turn.opposite()) {
            return Err(ChessError::InvalidPosition(
                "side not to move is in check".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=8).rev() {
            write!(f, "{} ", rank)?;
            for file in 1..=8 {
                let c = self
                    .get_piece(Position { file, rank })
                    .map_or('.', Piece::to_fen_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
