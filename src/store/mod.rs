//! Task storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database file

mod memory;
mod sqlite;

pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::task::{Task, TaskDraft, TaskPatch};

/// Task store trait - implemented by all storage backends.
///
/// The store owns id generation and display-order assignment on insert.
/// Everything else (validation, neighbor selection) lives in the service.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Insert a draft, assigning a fresh id and the next display order
    /// (max existing order + 1, or 1 for an empty store).
    async fn insert(&self, draft: TaskDraft) -> Result<Task, String>;

    /// Get a single task by id.
    async fn get(&self, id: Uuid) -> Result<Option<Task>, String>;

    /// Find a task by exact name match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Task>, String>;

    /// List all tasks, ordered by display order ascending.
    async fn list(&self) -> Result<Vec<Task>, String>;

    /// Apply a partial update. Returns the updated task, or `None` when the
    /// id is absent.
    async fn apply_patch(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, String>;

    /// Delete a task. Returns the removed record, or `None` when absent.
    /// Remaining orders are untouched, leaving a gap at the deleted rank.
    async fn delete(&self, id: Uuid) -> Result<Option<Task>, String>;

    /// Exchange the display orders of two tasks as one atomic operation.
    ///
    /// The expected orders act as a compare-and-swap guard: returns `false`
    /// without writing anything if either task is gone or its order changed
    /// underneath the caller.
    async fn swap_orders(
        &self,
        first: Uuid,
        first_order: i64,
        second: Uuid,
        second_order: i64,
    ) -> Result<bool, String>;
}

/// Task store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStoreType {
    Memory,
    #[default]
    Sqlite,
}

impl TaskStoreType {
    /// Parse from environment variable value.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" => Self::Memory,
            "sqlite" | "db" => Self::Sqlite,
            _ => Self::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Create a task store based on type and configuration.
pub async fn create_task_store(
    store_type: TaskStoreType,
    db_dir: PathBuf,
) -> Result<Arc<dyn TaskStore>, String> {
    match store_type {
        TaskStoreType::Memory => Ok(Arc::new(InMemoryTaskStore::new())),
        TaskStoreType::Sqlite => {
            let store = SqliteTaskStore::new(db_dir).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_type_parses_from_env_values() {
        assert_eq!(TaskStoreType::from_str("memory"), TaskStoreType::Memory);
        assert_eq!(TaskStoreType::from_str("sqlite"), TaskStoreType::Sqlite);
        assert_eq!(TaskStoreType::from_str("db"), TaskStoreType::Sqlite);
        assert_eq!(TaskStoreType::from_str("SQLite"), TaskStoreType::Sqlite);
        assert_eq!(TaskStoreType::from_str("garbage"), TaskStoreType::Sqlite);
    }
}
