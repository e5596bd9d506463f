//! In-memory task store (non-persistent).

use super::TaskStore;
use crate::task::{Task, TaskDraft, TaskPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn insert(&self, draft: TaskDraft) -> Result<Task, String> {
        let mut tasks = self.tasks.write().await;
        let next_order = tasks.values().map(|t| t.order).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            name: draft.name,
            cost: draft.cost,
            due_date: draft.due_date,
            order: next_order,
            created_at: now,
            updated_at: now,
        };
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, String> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Task>, String> {
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Task>, String> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    async fn apply_patch(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, String> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(cost) = patch.cost {
            task.cost = cost;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>, String> {
        Ok(self.tasks.write().await.remove(&id))
    }

    async fn swap_orders(
        &self,
        first: Uuid,
        first_order: i64,
        second: Uuid,
        second_order: i64,
    ) -> Result<bool, String> {
        // Single write lock covers the compare and both writes.
        let mut tasks = self.tasks.write().await;
        let current = (
            tasks.get(&first).map(|t| t.order),
            tasks.get(&second).map(|t| t.order),
        );
        if current != (Some(first_order), Some(second_order)) {
            return Ok(false);
        }
        let now = Utc::now();
        if let Some(task) = tasks.get_mut(&first) {
            task.order = second_order;
            task.updated_at = now;
        }
        if let Some(task) = tasks.get_mut(&second) {
            task.order = first_order;
            task.updated_at = now;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(name: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            cost: 10.0,
            due_date: NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_orders() {
        let store = InMemoryTaskStore::new();
        let a = store.insert(draft("a")).await.unwrap();
        let b = store.insert(draft("b")).await.unwrap();
        let c = store.insert(draft("c")).await.unwrap();
        assert_eq!((a.order, b.order, c.order), (1, 2, 3));
    }

    #[tokio::test]
    async fn insert_after_delete_continues_from_max_order() {
        let store = InMemoryTaskStore::new();
        store.insert(draft("a")).await.unwrap();
        let b = store.insert(draft("b")).await.unwrap();
        store.delete(b.id).await.unwrap();
        let c = store.insert(draft("c")).await.unwrap();
        // The next order comes from the surviving max, so the vacated
        // rank is reused here.
        assert_eq!(c.order, 2);
        let orders: Vec<i64> = store.list().await.unwrap().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn list_is_sorted_by_order() {
        let store = InMemoryTaskStore::new();
        for name in ["one", "two", "three"] {
            store.insert(draft(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn patch_applies_only_present_fields() {
        let store = InMemoryTaskStore::new();
        let task = store.insert(draft("a")).await.unwrap();
        let updated = store
            .apply_patch(
                task.id,
                TaskPatch {
                    cost: Some(0.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cost, 0.0);
        assert_eq!(updated.name, "a");
        assert_eq!(updated.due_date, task.due_date);
    }

    #[tokio::test]
    async fn swap_exchanges_orders() {
        let store = InMemoryTaskStore::new();
        let a = store.insert(draft("a")).await.unwrap();
        let b = store.insert(draft("b")).await.unwrap();
        let swapped = store
            .swap_orders(a.id, a.order, b.id, b.order)
            .await
            .unwrap();
        assert!(swapped);
        assert_eq!(store.get(a.id).await.unwrap().unwrap().order, 2);
        assert_eq!(store.get(b.id).await.unwrap().unwrap().order, 1);
    }

    #[tokio::test]
    async fn swap_refuses_stale_expected_orders() {
        let store = InMemoryTaskStore::new();
        let a = store.insert(draft("a")).await.unwrap();
        let b = store.insert(draft("b")).await.unwrap();
        let swapped = store.swap_orders(a.id, 99, b.id, b.order).await.unwrap();
        assert!(!swapped);
        // Nothing moved.
        assert_eq!(store.get(a.id).await.unwrap().unwrap().order, 1);
        assert_eq!(store.get(b.id).await.unwrap().unwrap().order, 2);
    }

    #[tokio::test]
    async fn swap_refuses_missing_task() {
        let store = InMemoryTaskStore::new();
        let a = store.insert(draft("a")).await.unwrap();
        let swapped = store
            .swap_orders(a.id, a.order, Uuid::new_v4(), 2)
            .await
            .unwrap();
        assert!(!swapped);
    }
}
