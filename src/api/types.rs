//! Wire-format request and response types.
//!
//! Field names are camelCase on the wire; due dates are `dd/mm/yyyy` text in
//! both directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{format_wire_date, Task};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub cost: f64,
    pub due_date: String,
}

/// Partial update. A missing field keeps the stored value; a present field
/// is applied as sent, including zero.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub due_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub name: String,
    pub cost: f64,
    /// Rendered as `dd/mm/yyyy`.
    pub due_date: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            name: t.name,
            cost: t.cost,
            due_date: format_wire_date(t.due_date),
            order: t.order,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Success envelope carrying a payload.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    pub message: String,
}

/// Success envelope without a payload (reorder operations).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}
