//! Shared application state.

use crate::config::AppConfig;
use crate::controller::PlannerController;
use crate::solver::SolverClient;

/// State shared by every endpoint handler.
pub struct AppState {
    pub config: AppConfig,
    pub solver: SolverClient,
    pub controller: PlannerController,
}
