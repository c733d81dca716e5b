use std::collections::HashMap;

use crate::{
    board::BoardKey,
    error::{ChessError, ChessResult},
    movegen::{is_king_in_check, legal_moves},
    piece::Color,
    Board, Move,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMove,
    ThreefoldRepetition,
    InsufficientMaterial,
    MoveLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

/// Checkmate or stalemate for the side to move, independent of any history.
pub fn terminal_state(board: &Board) -> Option<GameOutcome> {
    if !legal_moves(board).is_empty() {
        return None;
    }
    let turn = board.current_turn();
    if is_king_in_check(board, turn) {
        Some(GameOutcome::Checkmate { winner: turn.opposite() })
    } else {
        Some(GameOutcome::Stalemate)
    }
}

/// A game in progress: the current board plus what is needed to judge draws
/// that depend on history.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    moves: Vec<Move>,
    repetitions: HashMap<BoardKey, u32>,
    move_limit: Option<u32>,
    outcome: Option<GameOutcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::new())
    }
}

impl Game {
    pub fn new(board: Board) -> Self {
        let mut game = Self {
            board,
            moves: Vec::new(),
            repetitions: HashMap::new(),
            move_limit: None,
            outcome: None,
        };
        game.repetitions.insert(board.key(), 1);
        game.outcome = game.judge();
        game
    }

    /// Ends the game as a draw once the fullmove number passes `limit`.
    pub fn with_move_limit(mut self, limit: u32) -> Self {
        self.move_limit = Some(limit);
        self.outcome = self.judge();
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// How many times the current position has occurred in this game.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.board.key()).copied().unwrap_or(0)
    }

    /// Plays a move after checking it is legal, returning the outcome if the
    /// game ended with it.
    pub fn play(&mut self, mv: Move) -> ChessResult<Option<GameOutcome>> {
        if self.is_over() {
            return Err(ChessError::GameOver);
        }
        let legal = self
            .board
            .find_legal_move(&mv.key())
            .ok_or_else(|| ChessError::IllegalMove(mv.to_coordinate()))?;

        self.board = self.board.apply_move(&legal);
        self.moves.push(legal);
        *self.repetitions.entry(self.board.key()).or_insert(0) += 1;
        self.outcome = self.judge();

        if let Some(outcome) = self.outcome {
            log::debug!("game over after {}: {:?}", legal, outcome);
        }
        Ok(self.outcome)
    }

    /// Plays a move given in coordinate notation.
    pub fn play_notation(&mut self, notation: &str) -> ChessResult<Option<GameOutcome>> {
        if self.is_over() {
            return Err(ChessError::GameOver);
        }
        let mv = self.board.find_move(notation)?;
        self.play(mv)
    }

    fn judge(&self) -> Option<GameOutcome> {
        if let Some(terminal) = terminal_state(&self.board) {
            return Some(terminal);
        }
        if self.board.is_fifty_move_draw() {
            return Some(GameOutcome::Draw(DrawReason::FiftyMove));
        }
        if self.repetition_count() >= 3 {
            return Some(GameOutcome::Draw(DrawReason::ThreefoldRepetition));
        }
        if self.board.has_insufficient_material() {
            return Some(GameOutcome::Draw(DrawReason::InsufficientMaterial));
        }
        if let Some(limit) = self.move_limit {
            if self.board.fullmove_number() > limit {
                return Some(GameOutcome::Draw(DrawReason::MoveLimit));
            }
        }
        None
    }
}
