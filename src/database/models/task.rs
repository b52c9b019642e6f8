use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Task lifecycle. The UI only toggles todo <-> done; in-progress is
/// reachable through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// A to-do item. `parent` links subtasks to their parent task; deleting a
/// task removes its entire subtree via the foreign-key cascade.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub creator: Uuid,
    pub parent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub parent: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Field merge for PUT: only present fields overwrite stored values.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub parent: Option<Uuid>,
}

impl Task {
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
    ) -> Result<Option<Task>, DatabaseError> {
        let task =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND creator = $2")
                .bind(id)
                .bind(creator)
                .fetch_optional(pool)
                .await?;

        Ok(task)
    }

    /// List tasks under `parent`, or top-level tasks when `parent` is None.
    pub async fn list_children(
        pool: &PgPool,
        creator: Uuid,
        parent: Option<Uuid>,
    ) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE creator = $1 AND parent IS NOT DISTINCT FROM $2
             ORDER BY created_at",
        )
        .bind(creator)
        .bind(parent)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    pub async fn insert(
        pool: &PgPool,
        creator: Uuid,
        new_task: NewTask,
    ) -> Result<Task, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, description, parent, due_date, creator)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.parent)
        .bind(new_task.due_date)
        .bind(creator)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Merge `changes` into the owned task. Returns None when the task does
    /// not exist or belongs to someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                 title       = COALESCE($3, title),
                 description = COALESCE($4, description),
                 status      = COALESCE($5, status),
                 due_date    = COALESCE($6, due_date),
                 parent      = COALESCE($7, parent),
                 updated_at  = now()
             WHERE id = $1 AND creator = $2
             RETURNING *",
        )
        .bind(id)
        .bind(creator)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.due_date)
        .bind(changes.parent)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Delete the owned task; the subtree goes with it. Returns false when
    /// nothing matched.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, creator: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND creator = $2")
            .bind(id)
            .bind(creator)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
