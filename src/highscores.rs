//! Local best score
//!
//! Persisted to the key-value store as a decimal string.

use crate::platform::KeyValueStore;

/// The best score seen on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub value: u32,
}

impl HighScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "fallingObjectsLocalHighScore";

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Load the high score, treating missing or unparsable data as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let value = store
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        log::info!("Local high score: {}", value);
        Self { value }
    }

    /// Record a final score; persists and returns true only on a new best
    pub fn record(&mut self, score: u32, store: &mut impl KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }

        self.value = score;
        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score saved: {}", score),
            Err(e) => log::warn!("New high score {} not persisted: {}", score, e),
        }
        true
    }
}
