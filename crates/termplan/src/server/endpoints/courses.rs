//! Catalog endpoints: course retrieval and create pass-throughs.
//!
//! Validation of created entities belongs to the solver; these handlers
//! relay its structured rejection payloads untouched.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::types::ApiErrorType;
use crate::solver::{CreateCourseRequest, CreateSectionRequest, SolverError};
use crate::types::AppState;

/// GET /courses
/// Returns the solver's course catalog.
pub async fn get_courses(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /courses");

    match s.solver.fetch_courses().await {
        Ok(courses) => (StatusCode::OK, Json(courses)).into_response(),
        Err(e) => {
            error!("Failed to fetch courses: {}", e);
            solver_error_to_response(e, "Failed to fetch course catalog")
        }
    }
}

/// POST /courses/create
/// Forwards course creation to the solver and echoes its answer.
pub async fn post_create_course(
    State(s): State<Arc<AppState>>,
    Json(request): Json<CreateCourseRequest>,
) -> Response {
    info!("POST /courses/create - {}", request.code);

    match s.solver.create_course(&request).await {
        Ok(course) => (StatusCode::CREATED, Json(course)).into_response(),
        Err(e) => {
            error!("Failed to create course: {}", e);
            solver_error_to_response(e, "Failed to create course")
        }
    }
}

/// POST /sections/create
/// Forwards section creation to the solver and echoes its answer.
pub async fn post_create_section(
    State(s): State<Arc<AppState>>,
    Json(request): Json<CreateSectionRequest>,
) -> Response {
    info!("POST /sections/create - course {}", request.course);

    match s.solver.create_section(&request).await {
        Ok(section) => (StatusCode::CREATED, Json(section)).into_response(),
        Err(e) => {
            error!("Failed to create section: {}", e);
            solver_error_to_response(e, "Failed to create section")
        }
    }
}

/// Maps solver errors onto API responses, passing structured field errors
/// through to the caller.
fn solver_error_to_response(error: SolverError, fallback: &str) -> Response {
    match error {
        SolverError::Rejected { errors, .. } => {
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        other => {
            let status = if other.is_transport() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            ApiErrorType::from((status, fallback, Some(other.to_string()))).into_response()
        }
    }
}
