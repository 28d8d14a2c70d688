//! Fixed-size transposition table. Entries keep the full hash key so index
//! collisions are detected on probe instead of corrupting the search.

use crate::moves::Move;
use crate::search::MATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact for the stored depth.
    Exact,
    /// Score is a lower bound (a beta cutoff happened).
    Lower,
    /// Score is an upper bound (no move raised alpha).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub key: u64,
    pub best_move: Move,
    pub score: i32,
    pub depth: i16,
    pub bound: Bound,
    /// Search generation the entry was written in.
    pub age: u16,
}

/// Should `new` evict `existing`? Empty slots and entries from earlier
/// searches always lose; within a generation, deeper entries win.
pub fn should_replace(existing: Option<&Entry>, new_depth: i16, new_age: u16) -> bool {
    match existing {
        None => true,
        Some(entry) => new_age > entry.age || new_depth >= entry.depth,
    }
}

pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
    mask: usize,
}

pub const DEFAULT_TT_ENTRIES: usize = 1 << 20;

impl TranspositionTable {
    /// Creates a table with at least `entries` slots, rounded up to a
    /// power of two so indexing is a mask.
    pub fn new(entries: usize) -> TranspositionTable {
        let capacity = entries.next_power_of_two().max(1024);
        TranspositionTable {
            entries: vec![None; capacity],
            mask: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|slot| *slot = None);
    }

    /// Looks up a position. Returns `None` on an index collision with a
    /// different position. Mate scores are translated back to be relative
    /// to the probing ply.
    pub fn probe(&self, key: u64, ply: u16) -> Option<Entry> {
        let slot = self.entries[(key as usize) & self.mask]?;
        if slot.key != key {
            return None;
        }

        let mut entry = slot;
        entry.score = score_from_tt(entry.score, ply);
        Some(entry)
    }

    pub fn store(
        &mut self,
        key: u64,
        best_move: Move,
        score: i32,
        depth: i16,
        bound: Bound,
        age: u16,
        ply: u16,
    ) {
        let index = (key as usize) & self.mask;

        if should_replace(self.entries[index].as_ref(), depth, age) {
            self.entries[index] = Some(Entry {
                key,
                best_move,
                score: score_to_tt(score, ply),
                depth,
                bound,
                age,
            });
        }
    }
}

/// Mate scores are stored relative to the current node, not the root, so a
/// hit at a different ply still means "mate in N from here".
fn score_to_tt(score: i32, ply: u16) -> i32 {
    if score > MATE - 1000 {
        score + ply as i32
    } else if score < -MATE + 1000 {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u16) -> i32 {
    if score > MATE - 1000 {
        score - ply as i32
    } else if score < -MATE + 1000 {
        score + ply as i32
    } else {
        score
    }
}
