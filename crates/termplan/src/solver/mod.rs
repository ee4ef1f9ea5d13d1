//! HTTP client for the external schedule solver.
//!
//! The solver owns course data, validation, and the scheduling algorithm;
//! this module only consumes its contract:
//! - `GET courses/`: course catalog
//! - `POST generate-schedules/`: schedule generation for a selection
//! - `POST courses/create/`, `POST sections/create/`: entity creation

mod error;
mod types;

pub use error::SolverError;
pub use types::*;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::config::SolverConfig;

/// Client for the schedule solver API.
pub struct SolverClient {
    client: Client,
    base_url: Url,
}

impl SolverClient {
    /// Creates a client from configuration.
    ///
    /// # Returns
    /// * `Ok(SolverClient)` - Ready-to-use client with timeouts applied
    /// * `Err(SolverError)` - If the base URL is invalid or the HTTP client
    ///   cannot be built
    pub fn new(config: &SolverConfig) -> Result<Self, SolverError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SolverError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SolverError> {
        self.base_url.join(path).map_err(SolverError::from)
    }

    /// Fetches the full course catalog.
    pub async fn fetch_courses(&self) -> Result<Vec<Course>, SolverError> {
        let url = self.endpoint("courses/")?;
        debug!(url = %url, "Fetching course catalog from solver");

        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        let courses: Vec<Course> = parse_body(response).await?;

        info!(count = courses.len(), "Fetched course catalog");
        Ok(courses)
    }

    /// Requests schedule generation for the selected courses.
    ///
    /// Normalizes all accepted response shapes (single schedule, legacy
    /// list, empty/absent body) into a list; an empty list means the solver
    /// found no feasible schedule.
    pub async fn generate_schedules(
        &self,
        selected_courses: &[i64],
        preferences: &Preferences,
    ) -> Result<Vec<Schedule>, SolverError> {
        let url = self.endpoint("generate-schedules/")?;
        info!(
            selected = selected_courses.len(),
            "Requesting schedule generation"
        );

        let body = GenerateRequest {
            selected_courses,
            preferences,
        };
        let response = self.client.post(url).json(&body).send().await?;
        let response = check_status(response).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let payload: Option<GeneratePayload> =
            serde_json::from_str(&text).map_err(|e| SolverError::MalformedPayload {
                message: e.to_string(),
            })?;

        Ok(payload.map(GeneratePayload::into_schedules).unwrap_or_default())
    }

    /// Creates a course; the solver echoes the created entity back.
    pub async fn create_course(&self, request: &CreateCourseRequest) -> Result<Course, SolverError> {
        let url = self.endpoint("courses/create/")?;
        info!(code = %request.code, "Creating course via solver");

        let response = self.client.post(url).json(request).send().await?;
        let response = check_status(response).await?;
        parse_body(response).await
    }

    /// Creates a section; the solver echoes the created entity back.
    pub async fn create_section(
        &self,
        request: &CreateSectionRequest,
    ) -> Result<Section, SolverError> {
        let url = self.endpoint("sections/create/")?;
        info!(course = request.course, "Creating section via solver");

        let response = self.client.post(url).json(request).send().await?;
        let response = check_status(response).await?;
        parse_body(response).await
    }
}

/// Maps non-success statuses to errors, preserving structured rejection
/// payloads (field errors from create endpoints) when the body is JSON.
async fn check_status(response: Response) -> Result<Response, SolverError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    if status == StatusCode::BAD_REQUEST {
        if let Ok(errors) = serde_json::from_str::<serde_json::Value>(&text) {
            return Err(SolverError::Rejected {
                status: status.as_u16(),
                errors,
            });
        }
    }
    Err(SolverError::UnexpectedResponse {
        status: status.as_u16(),
        message: text,
    })
}

async fn parse_body<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, SolverError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| SolverError::MalformedPayload {
        message: e.to_string(),
    })
}
