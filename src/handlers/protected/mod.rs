pub mod albums;
pub mod auth;
pub mod progress;
pub mod projects;
pub mod tasks;
pub mod topics;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Encode a typed payload as a JSON value for handlers whose success shape
/// varies by query (single record vs. list).
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Failed to serialize response data: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })
}
