use axum::{extract::Query, Extension, Json};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{NewTask, Task, TaskChanges, TaskStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

use super::encode;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub id: Option<Uuid>,
    pub parent: Option<Uuid>,
}

/// Request body shared by POST (title required) and PUT (everything
/// optional, merged into the stored task).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
    pub parent: Option<Uuid>,
}

/// GET /api/v1/tasks?id=&parent= - One owned task by id, or the owned tasks
/// under `parent` (top-level tasks when no parent is given).
pub async fn get(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    if let Some(id) = query.id {
        let task = Task::find_owned(&pool, id, current_user.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;
        return Ok(ApiResponse::success(encode(&task)?));
    }

    let tasks = Task::list_children(&pool, current_user.id, query.parent).await?;
    Ok(ApiResponse::success(encode(&tasks)?))
}

/// POST /api/v1/tasks - Create a task; `title` is required, status defaults
/// to todo.
pub async fn post(
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<Task> {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let due_date = parse_due_date(payload.due_date.as_deref())?;
    let pool = DatabaseManager::pool().await?;

    // A parent must resolve to one of the caller's own tasks
    if let Some(parent) = payload.parent {
        Task::find_owned(&pool, parent, current_user.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Parent task not found"))?;
    }

    let task = Task::insert(
        &pool,
        current_user.id,
        NewTask {
            title: title.to_string(),
            description: payload.description.unwrap_or_default(),
            parent: payload.parent,
            due_date,
        },
    )
    .await?;

    Ok(ApiResponse::created(task))
}

/// PUT /api/v1/tasks?id= - Merge submitted fields into the owned task.
pub async fn put(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TaskQuery>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<Task> {
    let id = query
        .id
        .ok_or_else(|| ApiError::bad_request("Missing task id"))?;

    let due_date = parse_due_date(payload.due_date.as_deref())?;
    let pool = DatabaseManager::pool().await?;

    if let Some(parent) = payload.parent {
        if parent == id {
            return Err(ApiError::bad_request("A task cannot be its own parent"));
        }
        Task::find_owned(&pool, parent, current_user.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Parent task not found"))?;
    }

    let task = Task::update_owned(
        &pool,
        id,
        current_user.id,
        TaskChanges {
            title: payload.title,
            description: payload.description,
            status: payload.status,
            due_date,
            parent: payload.parent,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(ApiResponse::success(task))
}

/// DELETE /api/v1/tasks?id= - Delete the owned task and its whole subtree.
pub async fn delete(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Value> {
    let id = query
        .id
        .ok_or_else(|| ApiError::bad_request("Missing task id"))?;

    let pool = DatabaseManager::pool().await?;
    let deleted = Task::delete_owned(&pool, id, current_user.id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task not found"));
    }

    Ok(ApiResponse::success(json!({ "deleted": true })))
}

/// Coerce a client-supplied due date. Accepts RFC 3339 timestamps and plain
/// `YYYY-MM-DD` dates (taken as midnight UTC).
fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    if let Ok(date) = raw.parse::<NaiveDate>() {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        return Ok(Some(midnight));
    }

    Err(ApiError::bad_request(format!("Invalid dueDate: {}", raw)))
}
