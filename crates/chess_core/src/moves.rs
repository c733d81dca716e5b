use std::fmt;

use crate::{piece::{Piece, PieceType}, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// File the king lands on.
    pub fn king_target_file(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 3,
        }
    }

    /// (rook home file, rook target file).
    pub fn rook_files(self) -> (u8, u8) {
        match self {
            CastleSide::King => (8, 6),
            CastleSide::Queen => (1, 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Quiet,
    Capture,
    DoublePawnPush,
    EnPassant,
    Castle(CastleSide),
}

/// A fully described move. Moves are plain values; the flags are fixed at
/// generation time so consumers never need to re-inspect the board.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
    /// Kind of the piece removed by this move, if any (a pawn for en passant).
    pub captured: Option<PieceType>,
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from &&
        self.to == other.to &&
        self.move_type == other.move_type &&
        self.promotion == other.promotion
    }
}

impl Eq for Move {}

/// Lightweight move descriptor used for transposition hints, killer slots and
/// carrying a best move across searches.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct MoveKey {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
}

impl From<Move> for MoveKey {
    fn from(mv: Move) -> Self {
        mv.key()
    }
}

impl MoveKey {
    /// Parses coordinate notation such as `e2e4` or `e7e8q`.
    pub fn parse(text: &str) -> Option<Self> {
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return None;
        }
        let from = Position::from_algebraic(&text[0..2])?;
        let to = Position::from_algebraic(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            Some(c) => match PieceType::from_char(c)? {
                PieceType::Pawn | PieceType::King => return None,
                piece_type => Some(piece_type),
            },
            None => None,
        };
        Some(Self { from, to, promotion })
    }
}

impl fmt::Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

impl Move {
    pub fn quiet(from: Position, to: Position, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            move_type: MoveType::Quiet,
            promotion: None,
            captured: None,
        }
    }

    pub fn capture(from: Position, to: Position, piece: Piece, captured: PieceType) -> Self {
        Self {
            from,
            to,
            piece,
            move_type: MoveType::Capture,
            promotion: None,
            captured: Some(captured),
        }
    }

    pub fn with_promotion(self, promotion: PieceType) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    pub fn double_push(from: Position, to: Position, piece: Piece) -> Self {
        Self {
            move_type: MoveType::DoublePawnPush,
            ..Self::quiet(from, to, piece)
        }
    }

    pub fn en_passant(from: Position, to: Position, piece: Piece) -> Self {
        Self {
            move_type: MoveType::EnPassant,
            captured: Some(PieceType::Pawn),
            ..Self::quiet(from, to, piece)
        }
    }

    pub fn castle(from: Position, to: Position, piece: Piece, side: CastleSide) -> Self {
        Self {
            move_type: MoveType::Castle(side),
            ..Self::quiet(from, to, piece)
        }
    }

    pub fn key(&self) -> MoveKey {
        MoveKey {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    pub fn matches(&self, key: &MoveKey) -> bool {
        self.key() == *key
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.move_type, MoveType::Capture | MoveType::EnPassant)
    }

    pub fn is_en_passant(&self) -> bool {
        self.move_type == MoveType::EnPassant
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    pub fn is_double_push(&self) -> bool {
        self.move_type == MoveType::DoublePawnPush
    }

    pub fn castle_side(&self) -> Option<CastleSide> {
        match self.move_type {
            MoveType::Castle(side) => Some(side),
            _ => None,
        }
    }

    pub fn is_castle(&self) -> bool {
        self.castle_side().is_some()
    }

    /// Captures and promotions: the moves quiescence search looks at.
    pub fn is_tactical(&self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Coordinate notation, e.g. `e2e4`, `e7e8q`, `e1g1`.
    pub fn to_coordinate(&self) -> String {
        self.key().to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
