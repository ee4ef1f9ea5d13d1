//! Error types for the solver client.

use thiserror::Error;

/// Errors that can occur while talking to the schedule solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Solver returned a non-success status we have no structured payload for
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// Solver rejected a create request with a field-error payload
    #[error("Request rejected by solver ({status})")]
    Rejected {
        status: u16,
        errors: serde_json::Value,
    },

    /// Response body did not match the expected shape
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Solver base URL could not be parsed or joined
    #[error("Invalid solver URL: {message}")]
    BadUrl { message: String },
}

impl SolverError {
    /// Returns true when the failure is a transport problem rather than a
    /// semantic rejection by the solver.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SolverError::Network { .. } | SolverError::UnexpectedResponse { .. }
        )
    }
}

impl From<reqwest::Error> for SolverError {
    fn from(err: reqwest::Error) -> Self {
        SolverError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for SolverError {
    fn from(err: url::ParseError) -> Self {
        SolverError::BadUrl {
            message: err.to_string(),
        }
    }
}
