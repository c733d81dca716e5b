use std::time::Duration;

use chess_core::{Board, MoveKey};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SearchConfig;
use crate::search::{search, SearchReport};
use crate::selection::select_creative_move;
use crate::tt::TranspositionTable;

const MIN_DEPTH: u8 = 1;
const MAX_DEPTH: u8 = 12;

/// Stateful engine front end: owns the configuration, the random source used
/// for creative selection and, optionally, a transposition table that
/// survives between moves.
pub struct ChessAI {
    config: SearchConfig,
    rng: StdRng,
    tt: TranspositionTable,
    keep_table: bool,
    hint: Option<MoveKey>,
    generation: u64,
}

impl ChessAI {
    pub fn new(depth: u8) -> Self {
        let config = SearchConfig::default().with_depth(depth.clamp(MIN_DEPTH, MAX_DEPTH));
        Self::with_config(config)
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self::build(config, StdRng::from_entropy())
    }

    /// Reproducible engine: the same seed and positions give the same choices.
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: SearchConfig, rng: StdRng) -> Self {
        let tt = TranspositionTable::new(config.transposition_table_size);
        ChessAI {
            config,
            rng,
            tt,
            keep_table: false,
            hint: None,
            generation: 0,
        }
    }

    /// Keeps the transposition table between calls instead of starting fresh.
    pub fn persistent_table(mut self, keep: bool) -> Self {
        self.keep_table = keep;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_time(&mut self, duration: Duration) {
        self.config.time_limit_ms = duration.as_millis().min(u64::MAX as u128) as u64;
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.config.depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    }

    /// Best move carried over from the previous search, searched first next time.
    pub fn hint(&self) -> Option<MoveKey> {
        self.hint
    }

    pub fn set_hint(&mut self, hint: Option<MoveKey>) {
        self.hint = hint;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a report still belongs to the latest search.
    pub fn is_current(&self, report: &SearchReport) -> bool {
        report.generation == self.generation
    }

    /// Forgets everything learned from previous searches.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.hint = None;
    }

    pub fn table_len(&self) -> usize {
        self.tt.len()
    }

    /// Searches `board` and decides which move to play.
    pub fn get_move(&mut self, board: &Board) -> SearchReport {
        self.generation += 1;
        if !self.keep_table {
            self.tt.clear();
        }

        let mut report = search(board, &self.config, &mut self.tt, self.hint);
        report.generation = self.generation;

        if let Some(creative) = select_creative_move(board, &report.candidates, &self.config.creativity, &mut self.rng) {
            report.chosen_move = Some(creative);
        }

        self.hint = report.best_move.map(|mv| mv.key());
        report
    }
}

impl Default for ChessAI {
    fn default() -> Self {
        Self::with_config(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_is_clamped() {
        assert_eq!(ChessAI::new(0).config().depth, MIN_DEPTH);
        assert_eq!(ChessAI::new(40).config().depth, MAX_DEPTH);
    }

    #[test]
    fn generations_mark_stale_reports() {
        let config = SearchConfig::default().with_depth(1);
        let mut ai = ChessAI::with_seed(config, 3);
        let first = ai.get_move(&Board::new());
        assert!(ai.is_current(&first));
        let second = ai.get_move(&Board::new());
        assert!(!ai.is_current(&first));
        assert!(ai.is_current(&second));
        assert_eq!(second.generation, 2);
    }

    #[test]
    fn best_move_becomes_the_next_hint() {
        let mut ai = ChessAI::with_seed(SearchConfig::default().with_depth(1), 3);
        let report = ai.get_move(&Board::new());
        assert_eq!(ai.hint(), report.best_move.map(|mv| mv.key()));
        ai.reset();
        assert_eq!(ai.hint(), None);
    }

    #[test]
    fn table_survives_only_when_persistent() {
        let config = SearchConfig::default().with_depth(2);
        let mut fresh = ChessAI::with_seed(config.clone(), 1);
        let mut kept = ChessAI::with_seed(config, 1).persistent_table(true);

        let board = Board::new();
        fresh.get_move(&board);
        kept.get_move(&board);
        let after_one = kept.table_len();
        assert!(after_one > 0);

        let next = board.find_move("e2e4").unwrap();
        let board = board.apply_move(&next);
        fresh.get_move(&board);
        kept.get_move(&board);
        assert!(kept.table_len() >= after_one);
        assert!(fresh.table_len() > 0);
    }
}
