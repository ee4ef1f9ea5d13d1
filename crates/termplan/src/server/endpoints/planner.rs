//! Planner endpoints: session inspection, selection, generation, and the
//! render model.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::controller::GenerateOutcome;
use crate::grid::WeekRenderModel;
use crate::server::types::ApiErrorType;
use crate::solver::Preferences;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectionBody {
    pub selected_courses: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub preferences: Preferences,
}

/// GET /session
/// Returns the controller's current state, mirroring the persisted keys.
pub async fn get_session(State(s): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(s.controller.snapshot())).into_response()
}

/// PUT /selection
/// Replaces the course selection.
pub async fn put_selection(
    State(s): State<Arc<AppState>>,
    Json(body): Json<SelectionBody>,
) -> Response {
    info!("PUT /selection - {} courses", body.selected_courses.len());

    match s.controller.set_selection(body.selected_courses) {
        Ok(selection) => {
            (StatusCode::OK, Json(json!({ "selectedCourses": selection }))).into_response()
        }
        Err(e) => {
            error!("Failed to persist selection: {}", e);
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist selection",
                Some(e.to_string()),
            ))
            .into_response()
        }
    }
}

/// POST /generate
/// Runs one generation round trip and reports the outcome.
pub async fn post_generate(
    State(s): State<Arc<AppState>>,
    body: Option<Json<GenerateBody>>,
) -> Response {
    info!("POST /generate");
    let body = body.map(|Json(inner)| inner).unwrap_or_default();

    match s.controller.generate(&s.solver, &body.preferences).await {
        GenerateOutcome::Generated { record } => {
            let render = record
                .items
                .first()
                .map(|schedule| WeekRenderModel::build(schedule, &s.config.grid));
            (
                StatusCode::OK,
                Json(json!({
                    "status": "generated",
                    "lastSchedules": record,
                    "render": render,
                })),
            )
                .into_response()
        }
        GenerateOutcome::NoFeasible => (
            StatusCode::OK,
            Json(json!({
                "status": "no_feasible",
                "message": "No feasible schedule found. Try relaxing your constraints.",
            })),
        )
            .into_response(),
        GenerateOutcome::Superseded => (
            StatusCode::CONFLICT,
            Json(json!({
                "status": "superseded",
                "message": "A newer generation request replaced this one.",
            })),
        )
            .into_response(),
        GenerateOutcome::Failed { message } => ApiErrorType::from((
            StatusCode::BAD_GATEWAY,
            "Schedule generation failed. Please try again.",
            Some(message),
        ))
        .into_response(),
    }
}

/// GET /schedule/render
/// Returns the render model for the current schedule.
pub async fn get_render(State(s): State<Arc<AppState>>) -> Response {
    match s.controller.render_model(&s.config.grid) {
        Some(model) => (StatusCode::OK, Json(model)).into_response(),
        None => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "No generated schedule available",
            None,
        ))
        .into_response(),
    }
}
