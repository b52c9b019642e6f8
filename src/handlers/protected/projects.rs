use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Project, ProjectChanges, ProjectLinks, Topic};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub links: Option<ProjectLinks>,
}

/// Project detail response: the project row with its topics embedded, the
/// document shape clients expect.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub topics: Vec<Topic>,
}

/// GET /api/v1/projects - The caller's projects.
pub async fn list(Extension(current_user): Extension<CurrentUser>) -> ApiResult<Vec<Project>> {
    let pool = DatabaseManager::pool().await?;
    let projects = Project::list_owned(&pool, current_user.id).await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/v1/projects - Create a project; `name` is required.
pub async fn create(
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Project> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;

    let pool = DatabaseManager::pool().await?;
    let project = Project::insert(
        &pool,
        current_user.id,
        name,
        payload.description.as_deref().unwrap_or(""),
        payload.links.unwrap_or_default(),
    )
    .await?;

    Ok(ApiResponse::created(project))
}

/// GET /api/v1/projects/:id - The owned project with its topics embedded.
pub async fn detail(
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProjectDetail> {
    let pool = DatabaseManager::pool().await?;

    let project = Project::find_owned(&pool, id, current_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    let topics = Topic::list_for_project(&pool, project.id).await?;

    Ok(ApiResponse::success(ProjectDetail { project, topics }))
}

/// PUT /api/v1/projects/:id - Merge submitted fields into the owned project.
pub async fn update(
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Project> {
    let pool = DatabaseManager::pool().await?;
    let project = Project::update_owned(
        &pool,
        id,
        current_user.id,
        ProjectChanges {
            name: payload.name,
            description: payload.description,
            links: payload.links,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(ApiResponse::success(project))
}

/// DELETE /api/v1/projects/:id - Remove the owned project and its topics.
pub async fn delete(
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let deleted = Project::delete_owned(&pool, id, current_user.id).await?;

    if !deleted {
        return Err(ApiError::not_found("Project not found"));
    }

    Ok(ApiResponse::success(json!({ "deleted": true })))
}
