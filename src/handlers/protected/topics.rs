use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Project, Topic};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTopicRequest {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTopicRequest {
    pub content: Option<String>,
}

/// POST /api/v1/projects/:id/topics - Append a titled topic to the owned
/// project.
pub async fn create(
    Extension(current_user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTopicRequest>,
) -> ApiResult<Topic> {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let pool = DatabaseManager::pool().await?;
    let project = Project::find_owned(&pool, project_id, current_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let topic = Topic::insert(&pool, project.id, title).await?;
    Ok(ApiResponse::created(topic))
}

/// PUT /api/v1/projects/:id/topics/:topicId - Overwrite one topic's content.
/// Sibling topics are untouched.
pub async fn update(
    Extension(current_user): Extension<CurrentUser>,
    Path((project_id, topic_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTopicRequest>,
) -> ApiResult<Topic> {
    let content = payload
        .content
        .ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let pool = DatabaseManager::pool().await?;
    Project::find_owned(&pool, project_id, current_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let topic = Topic::set_content(&pool, project_id, topic_id, &content)
        .await?
        .ok_or_else(|| ApiError::not_found("Topic not found"))?;

    Ok(ApiResponse::success(topic))
}

/// DELETE /api/v1/projects/:id/topics/:topicId - Remove one topic.
pub async fn delete(
    Extension(current_user): Extension<CurrentUser>,
    Path((project_id, topic_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    Project::find_owned(&pool, project_id, current_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let deleted = Topic::delete(&pool, project_id, topic_id).await?;
    if !deleted {
        return Err(ApiError::not_found("Topic not found"));
    }

    Ok(ApiResponse::success(json!({ "deleted": true })))
}
