//! Session results and the hand-off to persistence
//!
//! How results are stored is up to the collaborator behind [`ResultSink`];
//! the in-memory [`Leaderboard`] ranks them for the current process.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use sorted_vec::SortedVec;

use super::collision::Severity;

/// What a finished session hands to persistence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult {
    pub score: i64,
    pub distance_km: f32,
    /// Severity of the crash that ended the session, if any
    pub crash: Option<Severity>,
}

/// Receives results at the end of each session
pub trait ResultSink {
    fn record(&mut self, result: SessionResult);
}

/// Ranked entry, ordered by score then distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LeaderboardEntry {
    pub score: i64,
    pub distance_km: OrderedFloat<f32>,
    pub crashed: bool,
}

impl From<SessionResult> for LeaderboardEntry {
    fn from(result: SessionResult) -> Self {
        Self {
            score: result.score,
            distance_km: OrderedFloat(result.distance_km),
            crashed: result.crash.is_some(),
        }
    }
}

/// Best results first, capped at `capacity` entries
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: SortedVec<Reverse<LeaderboardEntry>>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: SortedVec::new(),
            capacity,
        }
    }

    /// Insert a result, returning its rank (0 = best) if it made the board
    pub fn insert(&mut self, result: SessionResult) -> Option<usize> {
        let entry = LeaderboardEntry::from(result);
        let rank = self.entries.insert(Reverse(entry));
        while self.entries.len() > self.capacity {
            self.entries.pop();
        }
        (rank < self.capacity).then_some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<LeaderboardEntry> {
        self.entries.first().map(|entry| entry.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = LeaderboardEntry> + '_ {
        self.entries.iter().map(|entry| entry.0)
    }
}

impl ResultSink for Leaderboard {
    fn record(&mut self, result: SessionResult) {
        self.insert(result);
    }
}
