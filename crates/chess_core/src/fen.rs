// Forsyth-Edwards Notation support for board snapshots.

use crate::{
    board::CastlingRights,
    error::{ChessError, ChessResult},
    piece::Color,
    Board, Piece, Position,
};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

impl Board {
    /// Parses a FEN string. The clock fields are optional and default to `0 1`.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 || parts.len() > 6 {
            return Err(invalid(format!("expected 4 to 6 fields, found {}", parts.len())));
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("board section must have 8 ranks"));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 8 - i as u8;
            let mut file = 1u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(invalid(format!("bad empty-square count '{}'", c)));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or_else(|| invalid(format!("unknown piece '{}'", c)))?;
                    let pos = Position::new(file, rank)
                        .ok_or_else(|| invalid(format!("rank {} overflows", rank)))?;
                    board = board.with_piece(pos, Some(piece));
                    file += 1;
                }
                if file > 9 {
                    return Err(invalid(format!("rank {} overflows", rank)));
                }
            }
            if file != 9 {
                return Err(invalid(format!("rank {} has {} files", rank, file - 1)));
            }
        }

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad side to move '{}'", other))),
        };

        let mut rights = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => rights.white_kingside = true,
                    'Q' => rights.white_queenside = true,
                    'k' => rights.black_kingside = true,
                    'q' => rights.black_queenside = true,
                    _ => return Err(invalid(format!("bad castling flag '{}'", c))),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            square => Some(
                Position::from_algebraic(square)
                    .ok_or_else(|| invalid(format!("bad en-passant square '{}'", square)))?,
            ),
        };

        let halfmove_clock = match parts.get(4) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("bad halfmove clock '{}'", text)))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(text) => text
                .parse()
                .map_err(|_| invalid(format!("bad fullmove number '{}'", text)))?,
            None => 1,
        };

        Ok(board
            .with_turn(turn)
            .with_castling_rights(rights)
            .with_en_passant(en_passant)
            .with_clocks(halfmove_clock, fullmove_number))
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (1..=8).rev() {
            let mut empty = 0;
            for file in 1..=8 {
                match self.get_piece(Position { file, rank }) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 1 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.current_turn() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights = self.castling_rights();
        let flags: String = [
            (rights.white_kingside, 'K'),
            (rights.white_queenside, 'Q'),
            (rights.black_kingside, 'k'),
            (rights.black_queenside, 'q'),
        ]
        .iter()
        .filter(|(held, _)| *held)
        .map(|(_, c)| *c)
        .collect();
        fen.push_str(if flags.is_empty() { "-" } else { flags.as_str() });

        fen.push(' ');
        match self.en_passant() {
            Some(square) => fen.push_str(&square.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock(), self.fullmove_number()));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_fen_matches_new_board() {
        assert_eq!(Board::from_fen(STARTING_FEN).unwrap(), Board::new());
        assert_eq!(Board::new().to_fen(), STARTING_FEN);
    }

    #[test]
    fn round_trips_a_middlegame_snapshot() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);

        let fen = "8/8/8/3pP3/8/8/8/4K2k w - d6 3 41";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn clocks_are_optional() {
        let err = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b -").unwrap_err();
        assert!(matches!(err, ChessError::InvalidFen(_)));

        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.current_turn(), Color::Black);
    }

    #[test]
    fn rejects_malformed_boards() {
        for fen in [
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "ppppppppp/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/8/8/8/8/7 w - - 0 1",
            "8/8/8/8/8/8/8/8 x - - 0 1",
            "8/8/8/8/8/8/8/8 w X - 0 1",
            "8/8/8/8/8/8/8/8 w - z9 0 1",
            "8/8/8/8/8/8/8/8 w - - a 1",
            "8/8/8/8/8/8/8/7z w - - 0 1",
        ] {
            assert!(Board::from_fen(fen).is_err(), "accepted {}", fen);
        }
    }
}
