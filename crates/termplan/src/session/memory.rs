//! In-memory session store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{
    decode_snapshot, storable, ScheduleRecord, SessionSnapshot, SessionStore, StoreError,
    LAST_SCHEDULES_KEY, SELECTED_COURSES_KEY,
};

/// Session store backed by a plain map. Uses the same JSON encoding as the
/// SQLite store so both exercise identical parse paths.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw value for a key, bypassing encoding. Lets tests inject
    /// corrupt data.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionSnapshot {
        decode_snapshot(self.get(SELECTED_COURSES_KEY), self.get(LAST_SCHEDULES_KEY))
    }

    fn save(
        &self,
        selection: &[i64],
        schedules: Option<&ScheduleRecord>,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            SELECTED_COURSES_KEY.to_string(),
            serde_json::to_string(selection)?,
        );
        match storable(schedules) {
            Some(record) => {
                entries.insert(LAST_SCHEDULES_KEY.to_string(), serde_json::to_string(record)?);
            }
            None => {
                entries.remove(LAST_SCHEDULES_KEY);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_clear() {
        let store = MemorySessionStore::new();
        let record = ScheduleRecord {
            generated_at: "2024-11-02T16:20:00Z".to_string(),
            items: vec![crate::solver::Schedule {
                total_credits: 4,
                sections: Vec::new(),
            }],
        };

        // items are present but the schedule inside is empty; that is still
        // a storable record, emptiness is judged on `items` alone
        store.save(&[1, 2, 3], Some(&record)).unwrap();
        assert_eq!(store.load().selection, [1, 2, 3]);
        assert_eq!(store.load().schedules, Some(record));

        store.save(&[1], None).unwrap();
        assert_eq!(store.load().selection, [1]);
        assert_eq!(store.load().schedules, None);
    }

    #[test]
    fn test_corruption_resilience() {
        let store = MemorySessionStore::new();
        store.put_raw(SELECTED_COURSES_KEY, "]][[");
        store.put_raw(LAST_SCHEDULES_KEY, "<html>oops</html>");

        let snapshot = store.load();
        assert!(snapshot.selection.is_empty());
        assert!(snapshot.schedules.is_none());
    }
}
