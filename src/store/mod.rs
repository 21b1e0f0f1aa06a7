use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StorageError;
use crate::types::{GameType, PerformanceRecord, UserPreferences};

/// Append-only log of completed sessions, queryable per user and game type.
pub trait PerformanceStore: Send + Sync {
    fn append(&self, record: PerformanceRecord) -> Result<(), StorageError>;

    /// Most-recent-first when `newest_first` is set. `game_type = None`
    /// returns sessions across all games.
    fn query(
        &self,
        user_id: &str,
        game_type: Option<GameType>,
        limit: usize,
        newest_first: bool,
    ) -> Result<Vec<PerformanceRecord>, StorageError>;
}

pub trait PreferenceStore: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<UserPreferences>, StorageError>;
    fn put(&self, user_id: &str, prefs: UserPreferences) -> Result<(), StorageError>;
}

/// Resolve a user's preferences, falling back to the documented defaults when
/// the store has none or the read fails.
pub fn preferences_or_default(store: &dyn PreferenceStore, user_id: &str) -> UserPreferences {
    match store.get(user_id) {
        Ok(Some(prefs)) => prefs,
        Ok(None) => UserPreferences::default(),
        Err(err) => {
            tracing::warn!(user_id, error = %err, "preference read failed, using defaults");
            UserPreferences::default()
        }
    }
}

/// In-process store used by tests and by embedders that bring no backend.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<PerformanceRecord>>,
    preferences: RwLock<HashMap<String, UserPreferences>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PerformanceStore for MemoryStore {
    fn append(&self, record: PerformanceRecord) -> Result<(), StorageError> {
        self.records.write().push(record);
        Ok(())
    }

    fn query(
        &self,
        user_id: &str,
        game_type: Option<GameType>,
        limit: usize,
        newest_first: bool,
    ) -> Result<Vec<PerformanceRecord>, StorageError> {
        let records = self.records.read();
        let mut matching: Vec<PerformanceRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| game_type.map_or(true, |g| r.game_type == g))
            .cloned()
            .collect();
        // insertion order is chronological
        if newest_first {
            matching.reverse();
        }
        matching.truncate(limit);
        Ok(matching)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, user_id: &str) -> Result<Option<UserPreferences>, StorageError> {
        Ok(self.preferences.read().get(user_id).cloned())
    }

    fn put(&self, user_id: &str, prefs: UserPreferences) -> Result<(), StorageError> {
        self.preferences.write().insert(user_id.to_string(), prefs);
        Ok(())
    }
}
