//! Durable persistence of the planner session.
//!
//! The session is two values: the last course selection and the last
//! generated schedules with their generation timestamp. Storage sits behind
//! the narrow [`SessionStore`] port so the medium (SQLite for the binary,
//! in-memory for tests) is swappable without touching controller logic.

mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Storage key for the ordered course-id selection.
pub const SELECTED_COURSES_KEY: &str = "selectedCourses";
/// Storage key for the last generated schedules.
pub const LAST_SCHEDULES_KEY: &str = "lastSchedules";

use crate::solver::Schedule;

/// The persisted schedule value: generation timestamp plus items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// RFC 3339 timestamp of the generation that produced `items`.
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub items: Vec<Schedule>,
}

/// Everything `load()` can recover. Missing or corrupt values degrade to
/// the field defaults rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub selection: Vec<i64>,
    pub schedules: Option<ScheduleRecord>,
}

/// Errors from the write path. The read path never fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {message}")]
    Backend { message: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

/// Narrow persistence port for the planner session.
pub trait SessionStore: Send + Sync {
    /// Loads the last known session. Corrupt or missing data yields the
    /// snapshot defaults; this never raises.
    fn load(&self) -> SessionSnapshot;

    /// Persists the current session. A record with no items (or `None`)
    /// deletes the stored schedule entry outright, so a stale schedule can
    /// never resurface after a cleared generation.
    fn save(&self, selection: &[i64], schedules: Option<&ScheduleRecord>)
        -> Result<(), StoreError>;
}

/// Decodes raw stored values into a snapshot, discarding anything
/// unparsable. Shared by every store implementation.
pub(crate) fn decode_snapshot(
    selection_raw: Option<String>,
    schedules_raw: Option<String>,
) -> SessionSnapshot {
    let selection = selection_raw
        .and_then(|raw| match serde_json::from_str::<Vec<i64>>(&raw) {
            Ok(ids) => Some(ids),
            Err(e) => {
                warn!(error = %e, "Discarding unparsable stored selection");
                None
            }
        })
        .unwrap_or_default();

    let schedules = schedules_raw.and_then(|raw| {
        match serde_json::from_str::<ScheduleRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Discarding unparsable stored schedules");
                None
            }
        }
    });

    SessionSnapshot {
        selection,
        schedules,
    }
}

/// A record is only worth storing when it has items.
pub(crate) fn storable(schedules: Option<&ScheduleRecord>) -> Option<&ScheduleRecord> {
    schedules.filter(|record| !record.items.is_empty())
}
