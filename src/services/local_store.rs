//! Key-value JSON persistence for the journal.
//!
//! Canonical collections are serialized to disk under fixed keys on every
//! canonical-state change and deserialized at startup. Missing or corrupt
//! files fall back to defaults rather than failing.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Fixed storage keys.
pub const KEY_TRADES: &str = "trades";
pub const KEY_USER_SETTINGS: &str = "userSettings";
pub const KEY_GLOBAL_PRICE_ALERTS: &str = "globalPriceAlerts";
pub const KEY_COPIED_TRADERS: &str = "copiedTraders";
pub const KEY_HAS_ONBOARDED: &str = "hasOnboarded";

/// File-backed key-value store.
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Open (and create if necessary) a store rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            if let Err(e) = fs::create_dir_all(&data_dir) {
                warn!("Failed to create data directory: {}", e);
            }
        }
        Self { data_dir }
    }

    /// Get the file path for a key.
    fn path_for(&self, key: &str) -> PathBuf {
        // Sanitize key for filesystem
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.data_dir.join(format!("{}.json", safe_key))
    }

    /// Load a value, or `None` if missing or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return None,
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to parse stored value for {}: {}", key, e);
                None
            }
        }
    }

    /// Persist a value under a key.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.path_for(key);

        match serde_json::to_string(value) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!("Failed to write {}: {}", key, e);
                } else {
                    debug!("Persisted {}", key);
                }
            }
            Err(e) => {
                warn!("Failed to serialize {}: {}", key, e);
            }
        }
    }

    /// Remove a stored value.
    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
