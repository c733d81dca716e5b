use std::collections::{HashMap, VecDeque};

use chess_core::{BoardKey, MoveKey};

use crate::search::MATE_THRESHOLD;

// Types of entries in our transposition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Exact,      // The stored score is exact
    LowerBound, // The real score might be higher
    UpperBound, // The real score might be lower
}

// Entry in our transposition table - caches results of previous searches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    pub depth: u8,                 // How deep we searched
    pub score: i32,                // Score we found, mate distance relative to this node
    pub entry_type: EntryType,     // How reliable this score is
    pub best_move: Option<MoveKey>, // Best move found at this position
}

/// What a probe tells the caller at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Probe {
    /// A score that may be returned immediately.
    pub cutoff: Option<i32>,
    /// The window after tightening with a bound entry.
    pub alpha: i32,
    pub beta: i32,
    /// Stored best move, whatever the depth of the entry.
    pub hint: Option<MoveKey>,
}

/// Bounded cache of search results keyed by exact position identity.
///
/// When full, the entry inserted longest ago is evicted. Overwriting an
/// existing key keeps its original insertion slot.
#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<BoardKey, TTEntry>,
    order: VecDeque<BoardKey>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            order: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn get(&self, key: &BoardKey) -> Option<&TTEntry> {
        self.entries.get(key)
    }

    /// Stores an entry, adjusting mate scores found `ply` plies from the root
    /// so they are relative to this position.
    pub fn store(&mut self, key: BoardKey, entry: TTEntry, ply: u8) {
        if self.capacity == 0 {
            return;
        }
        let entry = TTEntry { score: score_to_tt(entry.score, ply), ..entry };

        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    log::trace!("transposition table full, evicted oldest entry");
                }
                None => break,
            }
        }
        self.entries.insert(key, entry);
        self.order.push_back(key);
    }

    /// Looks a position up for a search at `depth` with window `(alpha, beta)`.
    ///
    /// Only entries searched at least as deep as requested can tighten the
    /// window or produce a cutoff. Shallower entries still supply their move.
    pub fn probe(&self, key: &BoardKey, depth: u8, alpha: i32, beta: i32, ply: u8) -> Probe {
        let mut probe = Probe { cutoff: None, alpha, beta, hint: None };
        let entry = match self.entries.get(key) {
            Some(entry) => entry,
            None => return probe,
        };
        probe.hint = entry.best_move;
        if entry.depth < depth {
            return probe;
        }

        let score = score_from_tt(entry.score, ply);
        match entry.entry_type {
            EntryType::Exact => {
                probe.cutoff = Some(score);
                return probe;
            }
            EntryType::LowerBound => probe.alpha = probe.alpha.max(score),
            EntryType::UpperBound => probe.beta = probe.beta.min(score),
        }
        if probe.alpha >= probe.beta {
            probe.cutoff = Some(score);
        }
        probe
    }
}

// Mate scores are stored as distance from the stored node, not from the root
fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}
