//! High score record
//!
//! A single best score, persisted as a JSON integer under a fixed key.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// Best score across all runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "lane_dodger_high_score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `score` beats the current record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Adopt `score` if it beats the record. Returns true on a new record.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load the record; missing or malformed values start from zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<HighScore>(json.trim()) {
                Ok(high) => {
                    log::info!("Loaded high score {}", high.best);
                    high
                }
                Err(e) => {
                    log::warn!("Ignoring malformed high score {json:?}: {e}");
                    Self::new()
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                Self::new()
            }
        }
    }

    /// Persist the record
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}
