use axum::{extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{ProgressChanges, ProgressEntry};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

use super::encode;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressPayload {
    pub day_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<Vec<String>>,
}

/// GET /api/v1/progress?id= - One owned entry by id, or all owned entries
/// ordered by day number ascending.
pub async fn get(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    if let Some(id) = query.id {
        let entry = ProgressEntry::find_owned(&pool, id, current_user.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Progress entry not found"))?;
        return Ok(ApiResponse::success(encode(&entry)?));
    }

    let entries = ProgressEntry::list_owned(&pool, current_user.id).await?;
    Ok(ApiResponse::success(encode(&entries)?))
}

/// POST /api/v1/progress - Create an entry; `dayNumber` and `title` are
/// required, `content` starts empty.
pub async fn post(
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProgressPayload>,
) -> ApiResult<ProgressEntry> {
    let day_number = payload
        .day_number
        .ok_or_else(|| ApiError::bad_request("dayNumber is required"))?;

    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let pool = DatabaseManager::pool().await?;
    let entry = ProgressEntry::insert(
        &pool,
        current_user.id,
        day_number,
        title,
        payload.description.as_deref().unwrap_or(""),
    )
    .await?;

    Ok(ApiResponse::created(entry))
}

/// PUT /api/v1/progress?id= - Merge submitted fields; a submitted `content`
/// list replaces the stored one wholesale.
pub async fn put(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ProgressQuery>,
    Json(payload): Json<ProgressPayload>,
) -> ApiResult<ProgressEntry> {
    let id = query
        .id
        .ok_or_else(|| ApiError::bad_request("Missing progress id"))?;

    let pool = DatabaseManager::pool().await?;
    let entry = ProgressEntry::update_owned(
        &pool,
        id,
        current_user.id,
        ProgressChanges {
            day_number: payload.day_number,
            title: payload.title,
            description: payload.description,
            content: payload.content,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Progress entry not found"))?;

    Ok(ApiResponse::success(entry))
}

/// DELETE /api/v1/progress?id= - Remove the owned entry. No cascade.
pub async fn delete(
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Value> {
    let id = query
        .id
        .ok_or_else(|| ApiError::bad_request("Missing progress id"))?;

    let pool = DatabaseManager::pool().await?;
    let deleted = ProgressEntry::delete_owned(&pool, id, current_user.id).await?;

    if !deleted {
        return Err(ApiError::not_found("Progress entry not found"));
    }

    Ok(ApiResponse::success(json!({ "deleted": true })))
}
