use crate::logic::board::Board;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    LowerBound, // Beta cutoff (fail-high)
    UpperBound, // Alpha cutoff (fail-low)
}

impl TTFlag {
    #[must_use]
    pub const fn negated(self) -> Self {
        match self {
            Self::Exact => Self::Exact,
            Self::LowerBound => Self::UpperBound,
            Self::UpperBound => Self::LowerBound,
        }
    }
}

// Cached search result. `score` is from Red's point of view and `depth` is
// the ply at which it was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub score: i32,
    pub depth: u8,
    pub flag: TTFlag,
}

pub trait CachePolicy {
    // Entry for `board` (or its mirror image) usable at ply `depth`.
    fn lookup(&self, board: &Board, depth: u8) -> Option<TTEntry>;

    fn insert(&mut self, board: &Board, entry: TTEntry);

    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CachePolicy for NoCache {
    fn lookup(&self, _board: &Board, _depth: u8) -> Option<TTEntry> {
        None
    }

    fn insert(&mut self, _board: &Board, _entry: TTEntry) {}
}

#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<Board, TTEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CachePolicy for TranspositionTable {
    fn lookup(&self, board: &Board, depth: u8) -> Option<TTEntry> {
        let entry = self
            .entries
            .get(board)
            .or_else(|| self.entries.get(&board.symmetric()))?;
        // Entries stored at a deeper ply than requested are ignored.
        (entry.depth <= depth).then_some(*entry)
    }

    fn insert(&mut self, board: &Board, entry: TTEntry) {
        self.entries.insert(*board, entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
