//! Score table
//!
//! Tracks the most recent final score and the top five. The host decides where
//! the JSON lives; nothing here touches storage.

use serde::{Deserialize, Serialize};

/// Maximum number of scores kept in the table
pub const MAX_TOP_SCORES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBoard {
    /// Final score of the last finished match
    pub recent: u64,
    /// Sorted descending, at most `MAX_TOP_SCORES` entries
    pub top: Vec<u64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would enter the table. Any score fills a free slot,
    /// zero included.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.top.len() < MAX_TOP_SCORES {
            return true;
        }
        self.top.last().is_none_or(|&lowest| score > lowest)
    }

    /// Rank a score would achieve (1-indexed), if it qualifies
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.top.iter().position(|&s| score > s);
        Some(pos.unwrap_or(self.top.len()) + 1)
    }

    /// Record a finished match. Returns the rank achieved, if any.
    pub fn record(&mut self, score: u64) -> Option<usize> {
        self.recent = score;
        let rank = self.potential_rank(score)?;
        self.top.insert(rank - 1, score);
        self.top.truncate(MAX_TOP_SCORES);
        log::info!("Score {} entered the table at rank {}", score, rank);
        Some(rank)
    }

    pub fn high_score(&self) -> Option<u64> {
        self.top.first().copied()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored table, restoring the ordering and size invariants
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut board: Self = serde_json::from_str(json)?;
        board.top.sort_unstable_by(|a, b| b.cmp(a));
        board.top.truncate(MAX_TOP_SCORES);
        Ok(board)
    }
}
