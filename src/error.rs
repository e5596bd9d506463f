//! Service error taxonomy and its HTTP mapping.
//!
//! Validation failures and boundary violations are client-facing and map to
//! 400 with their display text; missing records map to 404; storage failures
//! are logged and masked behind a generic 500 body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Which end of the list a move operation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::Top => write!(f, "top"),
            Boundary::Bottom => write!(f, "bottom"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("a task named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("task name must not be empty")]
    EmptyName,

    #[error("\"{0}\" is not a valid dd/mm/yyyy date")]
    InvalidDate(String),

    #[error("due date {0} is in the past")]
    PastDueDate(NaiveDate),

    #[error("cost must be a non-negative number, got {0}")]
    InvalidCost(f64),

    #[error("task {0} not found")]
    NotFound(Uuid),

    #[error("task is already at the {0} of the list")]
    AlreadyAtBoundary(Boundary),

    #[error("storage failure: {0}")]
    Store(String),
}

impl TaskError {
    pub fn status(&self) -> StatusCode {
        match self {
            TaskError::DuplicateName(_)
            | TaskError::EmptyName
            | TaskError::InvalidDate(_)
            | TaskError::PastDueDate(_)
            | TaskError::InvalidCost(_)
            | TaskError::AlreadyAtBoundary(_) => StatusCode::BAD_REQUEST,
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Internal detail goes to the log, never to the client.
            TaskError::Store(detail) => {
                tracing::error!("store failure: {}", detail);
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        assert_eq!(
            TaskError::DuplicateName("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskError::InvalidDate("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskError::AlreadyAtBoundary(Boundary::Top).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(TaskError::InvalidCost(-1.0).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_record_maps_to_not_found() {
        assert_eq!(
            TaskError::NotFound(Uuid::new_v4()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn store_failure_maps_to_internal_error() {
        assert_eq!(
            TaskError::Store("disk on fire".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn boundary_display() {
        assert_eq!(format!("{}", Boundary::Top), "top");
        assert_eq!(format!("{}", Boundary::Bottom), "bottom");
    }
}
