//! SQLite-based task store.

use super::TaskStore;
use crate::task::{Task, TaskDraft, TaskPatch};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    cost REAL NOT NULL,
    due_date TEXT NOT NULL,
    display_order INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_display_order ON tasks(display_order);
"#;

const TASK_COLUMNS: &str = "id, name, cost, due_date, display_order, created_at, updated_at";

/// Stored date format for `due_date` (day granularity, sortable).
const DB_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    pub async fn new(db_dir: PathBuf) -> Result<Self, String> {
        tokio::fs::create_dir_all(&db_dir)
            .await
            .map_err(|e| format!("Failed to create task store dir: {}", e))?;
        let db_path = db_dir.join("tasks.db");

        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .map_err(|e| format!("Failed to open SQLite database: {}", e))?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| format!("Failed to run schema: {}", e))?;
            Ok::<_, String>(conn)
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn conversion_err(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id_str: String = row.get(0)?;
    let due_str: String = row.get(3)?;
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;
    Ok(Task {
        id: Uuid::parse_str(&id_str).map_err(|e| conversion_err(0, e))?,
        name: row.get(1)?,
        cost: row.get(2)?,
        due_date: NaiveDate::parse_from_str(&due_str, DB_DATE_FORMAT)
            .map_err(|e| conversion_err(3, e))?,
        order: row.get(4)?,
        created_at: DateTime::parse_from_rfc3339(&created_str)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_err(5, e))?,
        updated_at: DateTime::parse_from_rfc3339(&updated_str)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_err(6, e))?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn insert(&self, draft: TaskDraft) -> Result<Task, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction().map_err(|e| e.to_string())?;

            let next_order: i64 = tx
                .query_row(
                    "SELECT COALESCE(MAX(display_order), 0) + 1 FROM tasks",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| e.to_string())?;

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

            tx.execute(
                "INSERT INTO tasks (id, name, cost, due_date, display_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id.to_string(),
                    task.name,
                    task.cost,
                    task.due_date.format(DB_DATE_FORMAT).to_string(),
                    task.order,
                    task.created_at.to_rfc3339(),
                    task.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| e.to_string())?;

            tx.commit().map_err(|e| e.to_string())?;
            Ok(task)
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.query_row(
                &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
                params![id.to_string()],
                row_to_task,
            )
            .optional()
            .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Task>, String> {
        let conn = self.conn.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.query_row(
                &format!("SELECT {} FROM tasks WHERE name = ?1", TASK_COLUMNS),
                params![name],
                row_to_task,
            )
            .optional()
            .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn list(&self) -> Result<Vec<Task>, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM tasks ORDER BY display_order ASC",
                    TASK_COLUMNS
                ))
                .map_err(|e| e.to_string())?;
            let tasks = stmt
                .query_map([], row_to_task)
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.to_string())?;
            Ok(tasks)
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn apply_patch(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction().map_err(|e| e.to_string())?;

            let existing = tx
                .query_row(
                    &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
                    params![id.to_string()],
                    row_to_task,
                )
                .optional()
                .map_err(|e| e.to_string())?;
            let Some(mut task) = existing else {
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

            tx.execute(
                "UPDATE tasks SET name = ?1, cost = ?2, due_date = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    task.name,
                    task.cost,
                    task.due_date.format(DB_DATE_FORMAT).to_string(),
                    task.updated_at.to_rfc3339(),
                    task.id.to_string(),
                ],
            )
            .map_err(|e| e.to_string())?;

            tx.commit().map_err(|e| e.to_string())?;
            Ok(Some(task))
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction().map_err(|e| e.to_string())?;

            let existing = tx
                .query_row(
                    &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
                    params![id.to_string()],
                    row_to_task,
                )
                .optional()
                .map_err(|e| e.to_string())?;
            let Some(task) = existing else {
                return Ok(None);
            };

            tx.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])
                .map_err(|e| e.to_string())?;

            tx.commit().map_err(|e| e.to_string())?;
            Ok(Some(task))
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn swap_orders(
        &self,
        first: Uuid,
        first_order: i64,
        second: Uuid,
        second_order: i64,
    ) -> Result<bool, String> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction().map_err(|e| e.to_string())?;
            let now = Utc::now().to_rfc3339();

            // The expected order in the WHERE clause makes each write
            // conditional; either both land or the whole swap rolls back.
            let first_hit = tx
                .execute(
                    "UPDATE tasks SET display_order = ?1, updated_at = ?2
                     WHERE id = ?3 AND display_order = ?4",
                    params![second_order, now, first.to_string(), first_order],
                )
                .map_err(|e| e.to_string())?;
            let second_hit = tx
                .execute(
                    "UPDATE tasks SET display_order = ?1, updated_at = ?2
                     WHERE id = ?3 AND display_order = ?4",
                    params![first_order, now, second.to_string(), second_order],
                )
                .map_err(|e| e.to_string())?;

            if first_hit == 1 && second_hit == 1 {
                tx.commit().map_err(|e| e.to_string())?;
                Ok(true)
            } else {
                tx.rollback().map_err(|e| e.to_string())?;
                Ok(false)
            }
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }
}
