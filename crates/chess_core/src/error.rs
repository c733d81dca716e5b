use thiserror::Error;

use crate::Position;

/// Errors raised by the chess core when handed malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("No piece at square {0}")]
    NoPieceAtSquare(Position),

    #[error("The game is already over")]
    GameOver,

    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

pub type ChessResult<T> = Result<T, ChessError>;
