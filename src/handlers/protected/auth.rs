use axum::Extension;

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

/// GET /api/auth/whoami - Current authenticated user profile.
pub async fn whoami(Extension(current_user): Extension<CurrentUser>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;

    let user = User::find_by_id(&pool, current_user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;

    Ok(ApiResponse::success(user))
}
