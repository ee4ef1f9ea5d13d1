//! Selection and schedule-generation orchestration.
//!
//! The controller is an explicit state machine: `Idle` or `Requesting` with
//! a request token. Persistence happens as a named side effect of each
//! transition, and a response is applied only if its token is still the
//! newest, so a slow first response cannot overwrite a later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::grid::{GridConfig, WeekRenderModel};
use crate::session::{ScheduleRecord, SessionStore, StoreError};
use crate::solver::{Preferences, Schedule, SolverClient, SolverError};

/// Phase of the generation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannerPhase {
    Idle,
    Requesting { token: u64 },
}

#[derive(Debug)]
struct PlannerState {
    phase: PlannerPhase,
    selection: Vec<i64>,
    schedules: Option<ScheduleRecord>,
}

/// Result of one generation request, for the caller to surface.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// The solver produced at least one usable schedule.
    Generated { record: ScheduleRecord },
    /// The solver answered but found nothing feasible.
    NoFeasible,
    /// Transport failure; `message` is for the log, not the user.
    Failed { message: String },
    /// A newer request was issued before this response landed; the
    /// response was discarded and current state belongs to the newer one.
    Superseded,
}

/// Serializable view of controller state, mirroring the persisted keys.
#[derive(Debug, Serialize)]
pub struct ControllerSnapshot {
    pub requesting: bool,
    #[serde(rename = "selectedCourses")]
    pub selection: Vec<i64>,
    #[serde(rename = "lastSchedules", skip_serializing_if = "Option::is_none")]
    pub schedules: Option<ScheduleRecord>,
}

pub struct PlannerController {
    state: Mutex<PlannerState>,
    store: Arc<dyn SessionStore>,
    next_token: AtomicU64,
}

impl PlannerController {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            state: Mutex::new(PlannerState {
                phase: PlannerPhase::Idle,
                selection: Vec::new(),
                schedules: None,
            }),
            store,
            next_token: AtomicU64::new(0),
        }
    }

    /// Seeds in-memory state from the persisted session. Called once at
    /// startup, before the HTTP surface is up.
    pub fn restore(&self) {
        let snapshot = self.store.load();
        let mut state = self.state.lock().unwrap();
        info!(
            selected = snapshot.selection.len(),
            has_schedules = snapshot.schedules.is_some(),
            "Restored planner session"
        );
        state.selection = snapshot.selection;
        state.schedules = snapshot.schedules;
    }

    /// Replaces the course selection (deduplicated, order preserved) and
    /// persists the change.
    pub fn set_selection(&self, ids: Vec<i64>) -> Result<Vec<i64>, StoreError> {
        let mut deduped: Vec<i64> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }

        let mut state = self.state.lock().unwrap();
        state.selection = deduped.clone();
        self.store.save(&state.selection, state.schedules.as_ref())?;
        Ok(deduped)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.lock().unwrap();
        ControllerSnapshot {
            requesting: matches!(state.phase, PlannerPhase::Requesting { .. }),
            selection: state.selection.clone(),
            schedules: state.schedules.clone(),
        }
    }

    /// Builds the render model for the current schedule, if any.
    pub fn render_model(&self, grid: &GridConfig) -> Option<WeekRenderModel> {
        let state = self.state.lock().unwrap();
        state
            .schedules
            .as_ref()
            .and_then(|record| record.items.first())
            .map(|schedule| WeekRenderModel::build(schedule, grid))
    }

    /// Runs one generation round trip against the solver.
    ///
    /// The state lock is never held across the await; the token decides
    /// whose response wins if requests overlap. No automatic retry.
    pub async fn generate(
        &self,
        solver: &SolverClient,
        preferences: &Preferences,
    ) -> GenerateOutcome {
        let (token, selection) = self.start_generation();
        let result = solver.generate_schedules(&selection, preferences).await;
        self.complete_generation(token, result)
    }

    /// Transition `idle -> requesting`: issues a fresh token and snapshots
    /// the selection the request will use.
    fn start_generation(&self) -> (u64, Vec<i64>) {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();
        state.phase = PlannerPhase::Requesting { token };
        info!(token, selected = state.selection.len(), "Generation started");
        (token, state.selection.clone())
    }

    /// Transition `requesting -> idle`: applies the solver's answer if the
    /// token is still current, with persistence as the transition's side
    /// effect.
    fn complete_generation(
        &self,
        token: u64,
        result: Result<Vec<Schedule>, SolverError>,
    ) -> GenerateOutcome {
        let mut state = self.state.lock().unwrap();

        match state.phase {
            PlannerPhase::Requesting { token: current } if current == token => {}
            _ => {
                warn!(token, "Discarding superseded generation response");
                return GenerateOutcome::Superseded;
            }
        }
        state.phase = PlannerPhase::Idle;

        match result {
            Ok(schedules) => {
                let usable: Vec<Schedule> =
                    schedules.into_iter().filter(Schedule::is_usable).collect();
                if usable.is_empty() {
                    info!(token, "Solver found no feasible schedule");
                    self.clear_schedules(&mut state);
                    GenerateOutcome::NoFeasible
                } else {
                    let record = ScheduleRecord {
                        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                        items: usable,
                    };
                    info!(
                        token,
                        schedules = record.items.len(),
                        generated_at = %record.generated_at,
                        "Generation succeeded"
                    );
                    state.schedules = Some(record.clone());
                    self.persist(&state);
                    GenerateOutcome::Generated { record }
                }
            }
            Err(e) => {
                error!(token, error = %e, "Generation failed");
                self.clear_schedules(&mut state);
                GenerateOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Drops the current schedule and its timestamp, deleting the persisted
    /// entry so it cannot resurface.
    fn clear_schedules(&self, state: &mut PlannerState) {
        state.schedules = None;
        self.persist(state);
    }

    fn persist(&self, state: &PlannerState) {
        if let Err(e) = self.store.save(&state.selection, state.schedules.as_ref()) {
            // Worst case is a non-durable session; the process carries on.
            error!(error = %e, "Failed to persist planner session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::solver::{Course, DaysField, Section};

    fn controller() -> (PlannerController, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (PlannerController::new(store.clone()), store)
    }

    fn schedule() -> Schedule {
        Schedule {
            total_credits: 3,
            sections: vec![Section {
                id: 1,
                course: Course {
                    id: 10,
                    code: "CSCI-210".to_string(),
                    title: "Data Structures".to_string(),
                    credits: 3,
                },
                section_number: "01".to_string(),
                instructor: None,
                days: Some(DaysField::Text("M,W".to_string())),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
            }],
        }
    }

    #[test]
    fn test_selection_dedup_and_persist() {
        let (ctl, store) = controller();
        let stored = ctl.set_selection(vec![3, 1, 3, 2, 1]).unwrap();
        assert_eq!(stored, [3, 1, 2]);
        assert_eq!(store.load().selection, [3, 1, 2]);
    }

    #[test]
    fn test_successful_generation_persists_record() {
        let (ctl, store) = controller();
        ctl.set_selection(vec![10]).unwrap();

        let (token, selection) = ctl.start_generation();
        assert_eq!(selection, [10]);
        assert!(ctl.snapshot().requesting);

        let outcome = ctl.complete_generation(token, Ok(vec![schedule()]));
        let record = match outcome {
            GenerateOutcome::Generated { record } => record,
            other => panic!("expected Generated, got {other:?}"),
        };
        assert!(!ctl.snapshot().requesting);
        assert_eq!(store.load().schedules, Some(record));
    }

    #[test]
    fn test_no_feasible_clears_schedule_and_timestamp() {
        let (ctl, store) = controller();
        let (token, _) = ctl.start_generation();
        ctl.complete_generation(token, Ok(vec![schedule()]));
        assert!(store.load().schedules.is_some());

        // Empty-section schedules do not count as usable results.
        let (token, _) = ctl.start_generation();
        let outcome = ctl.complete_generation(
            token,
            Ok(vec![Schedule {
                total_credits: 0,
                sections: Vec::new(),
            }]),
        );
        assert!(matches!(outcome, GenerateOutcome::NoFeasible));
        assert_eq!(store.load().schedules, None);
        assert!(ctl.snapshot().schedules.is_none());
    }

    #[test]
    fn test_transport_failure_clears_schedule() {
        let (ctl, store) = controller();
        let (token, _) = ctl.start_generation();
        ctl.complete_generation(token, Ok(vec![schedule()]));

        let (token, _) = ctl.start_generation();
        let outcome = ctl.complete_generation(
            token,
            Err(SolverError::Network {
                message: "connection refused".to_string(),
            }),
        );
        assert!(matches!(outcome, GenerateOutcome::Failed { .. }));
        assert_eq!(store.load().schedules, None);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (ctl, store) = controller();
        let (first, _) = ctl.start_generation();
        let (second, _) = ctl.start_generation();

        // The slow first response arrives after the second was issued.
        let outcome = ctl.complete_generation(first, Ok(vec![schedule()]));
        assert!(matches!(outcome, GenerateOutcome::Superseded));
        assert!(ctl.snapshot().requesting);
        assert_eq!(store.load().schedules, None);

        // The second response still applies normally.
        let outcome = ctl.complete_generation(second, Ok(vec![schedule()]));
        assert!(matches!(outcome, GenerateOutcome::Generated { .. }));
        assert!(store.load().schedules.is_some());
    }

    #[test]
    fn test_restore_seeds_state_from_store() {
        let store = Arc::new(MemorySessionStore::new());
        let record = ScheduleRecord {
            generated_at: "2024-11-02T16:20:00Z".to_string(),
            items: vec![schedule()],
        };
        store.save(&[10, 20], Some(&record)).unwrap();

        let ctl = PlannerController::new(store);
        ctl.restore();
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.selection, [10, 20]);
        assert_eq!(snapshot.schedules, Some(record));
    }

    #[test]
    fn test_render_model_uses_first_schedule() {
        let (ctl, _) = controller();
        let (token, _) = ctl.start_generation();
        ctl.complete_generation(token, Ok(vec![schedule()]));

        let model = ctl.render_model(&GridConfig::default()).unwrap();
        assert_eq!(model.total_credits, 3);
        assert_eq!(model.table.len(), 1);

        let (ctl, _) = controller();
        assert!(ctl.render_model(&GridConfig::default()).is_none());
    }
}
