//! Task entity and the textual date contract.
//!
//! Due dates cross the HTTP boundary as `dd/mm/yyyy` text on both input and
//! output; internally they are plain calendar dates at day granularity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Textual date format used on the wire, for both requests and responses.
pub const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// A unit of work with a name, a cost, a due date, and a display rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    /// Unique across all tasks (case-sensitive exact match).
    pub name: String,
    pub cost: f64,
    pub due_date: NaiveDate,
    /// Integer display rank. Strictly increasing on insert; deletes leave
    /// permanent gaps, so values are not guaranteed contiguous.
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new task. `id`, `order`, and the timestamps are
/// assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub cost: f64,
    pub due_date: NaiveDate,
}

/// Field-level changes for a partial update. `None` keeps the stored value;
/// a present value is applied even when it is falsy (e.g. a cost of zero).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cost.is_none() && self.due_date.is_none()
    }
}

/// Parse a `dd/mm/yyyy` string into a calendar date.
pub fn parse_wire_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), WIRE_DATE_FORMAT).ok()
}

/// Render a calendar date back into `dd/mm/yyyy` text.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}
