//! Wire types for the schedule solver API.

use serde::{Deserialize, Serialize};

/// A course as returned by the solver's catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub credits: u32,
}

/// One scheduled meeting pattern for a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub course: Course,
    pub section_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    /// Meeting days; the wire shape varies, see [`DaysField`].
    #[serde(default)]
    pub days: Option<DaysField>,

    /// Wall-clock start, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// Wall-clock end, strictly after `start_time` for a renderable section.
    pub end_time: String,
}

/// The three observed encodings of a section's day-set: a native list of
/// day codes, or a single string holding either a comma-separated list or a
/// serialized array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysField {
    List(Vec<String>),
    Text(String),
}

/// A solver-produced schedule: a set of sections plus the derived credit
/// total. Conflict checking is the solver's job, not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub total_credits: u32,
    pub sections: Vec<Section>,
}

impl Schedule {
    /// A schedule with no sections is not usable as a result.
    pub fn is_usable(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// Optional filters forwarded to the solver. Never interpreted locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avoid_days: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_classes_per_day: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
}

/// Body of `POST generate-schedules`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub selected_courses: &'a [i64],
    pub preferences: &'a Preferences,
}

/// Response of `POST generate-schedules`. The current contract returns a
/// single schedule object; older deployments returned a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GeneratePayload {
    Many(Vec<Schedule>),
    One(Schedule),
}

impl GeneratePayload {
    pub fn into_schedules(self) -> Vec<Schedule> {
        match self {
            GeneratePayload::Many(schedules) => schedules,
            GeneratePayload::One(schedule) => vec![schedule],
        }
    }
}

/// Body of `POST courses/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub credits: u32,
}

/// Body of `POST sections/create`. Days are sent in the native list shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub course: i64,
    pub section_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}
