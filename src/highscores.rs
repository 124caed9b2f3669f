//! Survival-time leaderboard
//!
//! Persisted as one JSON array under a fixed key, top 100 runs.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 100;

/// Characters in a leaderboard name
pub const NAME_LEN: usize = 3;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Three-character player tag
    pub name: String,
    /// Survival time in seconds
    pub time: f64,
}

/// Leaderboard, sorted descending by time
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "hell404_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        sort_entries(&mut entries);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Load from storage. Missing or malformed data gives an empty board.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match Self::read(store) {
            Ok(Some(entries)) => {
                log::info!("Loaded {} high scores", entries.len());
                Self::from_entries(entries)
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    fn read(store: &impl KeyValueStore) -> Result<Option<Vec<ScoreEntry>>, StorageError> {
        let Some(json) = store.get(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Persist the current entries
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Add a run, re-sort, cap and persist. A failed write is logged and the
    /// in-memory board still updates.
    ///
    /// Performs no duplicate detection; the caller enforces one submission
    /// per run.
    pub fn submit(
        &mut self,
        store: &mut impl KeyValueStore,
        name: &str,
        time: f64,
    ) -> &[ScoreEntry] {
        self.entries.push(ScoreEntry {
            name: name.to_string(),
            time,
        });
        sort_entries(&mut self.entries);
        self.entries.truncate(MAX_HIGH_SCORES);

        if let Err(e) = self.save(store) {
            log::warn!("Failed to save high scores: {}", e);
        }
        &self.entries
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Check if a time would make the board
    pub fn qualifies(&self, time: f64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| time > e.time).unwrap_or(true)
    }

    /// Rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, time: f64) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }
        let rank = self.entries.iter().position(|e| time > e.time);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best time (if any)
    pub fn top_time(&self) -> Option<f64> {
        self.entries.first().map(|e| e.time)
    }
}

/// Stable descending sort; earlier entries win ties
fn sort_entries(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.time.total_cmp(&a.time));
}

/// Format seconds as `MM:SS`, truncating the sub-second part
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Coerce free-form input into a three-character uppercase tag
pub fn normalize_name(input: &str) -> String {
    let mut name: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(NAME_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while name.len() < NAME_LEN {
        name.push('_');
    }
    name
}
