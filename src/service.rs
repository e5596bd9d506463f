//! Task service: validation rules and display-order maintenance.
//!
//! Everything with an invariant lives here. The store assigns ids and the
//! next display order on insert; this layer decides whether an operation is
//! legal and which two records a reorder exchanges.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Boundary, TaskError};
use crate::store::TaskStore;
use crate::task::{parse_wire_date, Task, TaskDraft, TaskPatch};

/// Raw wire-level input for an update. Each field distinguishes "not sent"
/// from "sent" so a provided zero cost is applied rather than dropped.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub due_date: Option<String>,
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    /// When set, update re-runs the create-time checks (name uniqueness,
    /// past-date rejection, non-negative cost) on the fields it receives.
    validate_updates: bool,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, validate_updates: bool) -> Self {
        Self {
            store,
            validate_updates,
        }
    }

    /// Create a task from wire-level input.
    ///
    /// Checks run in a fixed sequence: empty name, duplicate name, date
    /// parse, past date, cost. The store assigns the display order.
    pub async fn create(
        &self,
        name: &str,
        cost: f64,
        due_date_text: &str,
    ) -> Result<Task, TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::EmptyName);
        }
        if self
            .store
            .find_by_name(name)
            .await
            .map_err(TaskError::Store)?
            .is_some()
        {
            return Err(TaskError::DuplicateName(name.to_string()));
        }
        let due_date = parse_wire_date(due_date_text)
            .ok_or_else(|| TaskError::InvalidDate(due_date_text.to_string()))?;
        if due_date < today() {
            return Err(TaskError::PastDueDate(due_date));
        }
        check_cost(cost)?;

        self.store
            .insert(TaskDraft {
                name: name.to_string(),
                cost,
                due_date,
            })
            .await
            .map_err(TaskError::Store)
    }

    /// All tasks, ascending by display order.
    pub async fn list(&self) -> Result<Vec<Task>, TaskError> {
        self.store.list().await.map_err(TaskError::Store)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, TaskError> {
        self.store
            .get(id)
            .await
            .map_err(TaskError::Store)?
            .ok_or(TaskError::NotFound(id))
    }

    /// Delete a task, returning the removed record. The remaining display
    /// orders are untouched, so a gap stays at the deleted rank.
    pub async fn delete(&self, id: Uuid) -> Result<Task, TaskError> {
        self.store
            .delete(id)
            .await
            .map_err(TaskError::Store)?
            .ok_or(TaskError::NotFound(id))
    }

    /// Partial update. Omitted fields keep their stored values.
    pub async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task, TaskError> {
        let current = self.get(id).await?;

        let name = match update.name {
            Some(name) => {
                if name.trim().is_empty() {
                    return Err(TaskError::EmptyName);
                }
                if self.validate_updates && name != current.name {
                    let clash = self
                        .store
                        .find_by_name(&name)
                        .await
                        .map_err(TaskError::Store)?;
                    if clash.is_some() {
                        return Err(TaskError::DuplicateName(name));
                    }
                }
                Some(name)
            }
            None => None,
        };

        let due_date = match update.due_date {
            Some(text) => {
                let parsed = parse_wire_date(&text).ok_or(TaskError::InvalidDate(text))?;
                if self.validate_updates && parsed < today() {
                    return Err(TaskError::PastDueDate(parsed));
                }
                Some(parsed)
            }
            None => None,
        };

        if let Some(cost) = update.cost {
            if self.validate_updates {
                check_cost(cost)?;
            }
        }

        self.store
            .apply_patch(
                id,
                TaskPatch {
                    name,
                    cost: update.cost,
                    due_date,
                },
            )
            .await
            .map_err(TaskError::Store)?
            .ok_or(TaskError::NotFound(id))
    }

    /// Swap the task with its nearest predecessor by display order.
    pub async fn move_up(&self, id: Uuid) -> Result<(), TaskError> {
        self.swap_with_neighbor(id, Boundary::Top).await
    }

    /// Swap the task with its nearest successor by display order.
    pub async fn move_down(&self, id: Uuid) -> Result<(), TaskError> {
        self.swap_with_neighbor(id, Boundary::Bottom).await
    }

    /// Locate the neighbor in the sorted list and exchange the two display
    /// orders atomically. Nearest-neighbor lookup means gaps left by deletes
    /// never strand a task mid-list; only the true endpoints are boundaries.
    async fn swap_with_neighbor(&self, id: Uuid, direction: Boundary) -> Result<(), TaskError> {
        let tasks = self.list().await?;
        let pos = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        let neighbor = match direction {
            Boundary::Top => pos.checked_sub(1).map(|i| &tasks[i]),
            Boundary::Bottom => tasks.get(pos + 1),
        }
        .ok_or(TaskError::AlreadyAtBoundary(direction))?;
        let subject = &tasks[pos];

        let swapped = self
            .store
            .swap_orders(subject.id, subject.order, neighbor.id, neighbor.order)
            .await
            .map_err(TaskError::Store)?;
        if !swapped {
            // A concurrent reorder, update, or delete moved one of the two
            // records between the read and the swap.
            return Err(TaskError::Store(format!(
                "display order of {} or {} changed concurrently",
                subject.id, neighbor.id
            )));
        }
        Ok(())
    }
}

fn check_cost(cost: f64) -> Result<(), TaskError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(TaskError::InvalidCost(cost));
    }
    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
