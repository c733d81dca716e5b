use std::fmt;

/// A square on the board. Files and ranks are both 1-based (a1 = file 1, rank 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub rank: u8, // 1-8
    pub file: u8, // a-h (1-8)
}

impl Position {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Builds a square from a 0..64 index, a1 = 0, h8 = 63.
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Self {
            file: (index % 8) as u8 + 1,
            rank: (index / 8) as u8 + 1,
        }
    }

    pub fn index(self) -> usize {
        (self.rank as usize - 1) * 8 + (self.file as usize - 1)
    }

    /// Square reached by stepping `df` files and `dr` ranks, if still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// True for dark squares (a1 is dark).
    pub fn is_dark(self) -> bool {
        (self.file + self.rank) % 2 == 0
    }

    /// Distance from the nearest board edge along files and ranks, summed (0..=6).
    pub fn centrality(self) -> i32 {
        let file_c = (self.file - 1).min(8 - self.file) as i32;
        let rank_c = (self.rank - 1).min(8 - self.rank) as i32;
        file_c + rank_c
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8) - b'a' + 1,
            rank: (rank as u8) - b'0',
        })
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    /// Iterates all 64 squares from a1 to h8, rank by rank.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file - 1) as char,
            (b'0' + self.rank) as char
        )
    }
}
