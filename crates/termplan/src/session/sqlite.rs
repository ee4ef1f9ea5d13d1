//! SQLite-backed session store.

use rusqlite::{Connection, OptionalExtension};
use std::sync::Mutex;

use super::{
    decode_snapshot, storable, ScheduleRecord, SessionSnapshot, SessionStore, StoreError,
    LAST_SCHEDULES_KEY, SELECTED_COURSES_KEY,
};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_session.sql");

/// Session store persisting to a SQLite database file.
pub struct SqliteSessionStore {
    db: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Opens (or creates) the database at `db_path` and applies the schema.
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn read_key(&self, key: &str) -> Option<String> {
        let db = self.db.lock().unwrap();
        db.query_row(
            "SELECT value FROM session_store WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .ok()
        .flatten()
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO session_store (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            (key, value),
        )?;
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<(), StoreError> {
        let db = self.db.lock().unwrap();
        db.execute("DELETE FROM session_store WHERE key = ?1", [key])?;
        Ok(())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> SessionSnapshot {
        decode_snapshot(
            self.read_key(SELECTED_COURSES_KEY),
            self.read_key(LAST_SCHEDULES_KEY),
        )
    }

    fn save(
        &self,
        selection: &[i64],
        schedules: Option<&ScheduleRecord>,
    ) -> Result<(), StoreError> {
        self.write_key(SELECTED_COURSES_KEY, &serde_json::to_string(selection)?)?;
        match storable(schedules) {
            Some(record) => self.write_key(LAST_SCHEDULES_KEY, &serde_json::to_string(record)?),
            None => self.delete_key(LAST_SCHEDULES_KEY),
        }
    }
}
