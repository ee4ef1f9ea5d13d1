use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::server::endpoints::{courses, planner, status};
use crate::types::AppState;

mod endpoints;
mod types;

/// Creates the service router.
///
/// # Parameters
/// - `app_state`: The shared application state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Catalog endpoints proxying the solver
    let catalog_router = Router::new()
        .route("/courses", get(courses::get_courses))
        .route("/courses/create", post(courses::post_create_course))
        .route("/sections/create", post(courses::post_create_section));

    // Planner session endpoints
    let planner_router = Router::new()
        .route("/session", get(planner::get_session))
        .route("/selection", put(planner::put_selection))
        .route("/generate", post(planner::post_generate))
        .route("/schedule/render", get(planner::get_render));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(catalog_router)
        .merge(planner_router)
        .with_state(app_state)
}
