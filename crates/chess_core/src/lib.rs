// Core chess game logic modules
pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;

// Re-export main types for convenience
pub use board::{Board, BoardKey, CastlingRights};
pub use error::{ChessError, ChessResult};
pub use fen::STARTING_FEN;
pub use game::{terminal_state, DrawReason, Game, GameOutcome};
pub use movegen::{gives_check, is_king_in_check, legal_moves, legal_moves_from, perft, pseudo_moves};
pub use moves::{CastleSide, Move, MoveKey, MoveType};
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
