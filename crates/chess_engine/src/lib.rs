pub mod ai;
pub mod config;
pub mod evaluation;
pub mod killers;
pub mod ordering;
pub mod search;
pub mod selection;
pub mod tt;

pub use ai::ChessAI;
pub use config::{ConfigError, CreativityConfig, ExtensionConfig, SearchConfig};
pub use evaluation::{evaluate_position, piece_value};
pub use search::{search, RootCandidate, SearchReport, MATE_SCORE, MAX_QUIESCENCE_PLY};
pub use selection::select_creative_move;
pub use tt::TranspositionTable;
