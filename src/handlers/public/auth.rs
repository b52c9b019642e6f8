use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_in: u64,
}

/// POST /auth/register - Create a new account
///
/// Expected Input:
/// ```json
/// { "email": "dev@example.com", "name": "Dev", "password": "..." }
/// ```
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<User> {
    validate_email_format(&payload.email).map_err(ApiError::bad_request)?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let pool = DatabaseManager::pool().await?;

    if User::find_by_email(&pool, &payload.email).await?.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let cost = config::config().security.bcrypt_cost;
    let password_hash = bcrypt::hash(&payload.password, cost).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create account")
    })?;

    // The unique constraint still backstops a concurrent registration; the
    // duplicate-key case surfaces as 409 via the DatabaseError conversion.
    let user = User::create(&pool, &payload.email, payload.name.trim(), &password_hash).await?;

    tracing::info!(user = %user.id, "registered new account");
    Ok(ApiResponse::created(user))
}

/// POST /auth/login - Authenticate and receive a JWT token
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": { "token": "eyJ...", "user": { ... }, "expiresIn": 3600 }
/// }
/// ```
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let pool = DatabaseManager::pool().await?;

    // Same error for unknown email and wrong password
    let user = User::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal_server_error("Failed to verify credentials")
    })?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let claims = Claims::new(user.id, user.email.clone());
    let token = generate_jwt(claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::success(LoginResponse {
        token,
        user,
        expires_in,
    }))
}

/// GET / - Service index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "devlog-api",
            "version": version,
            "description": "Backend API for a build-log tracker",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public), /api/auth/whoami (protected)",
                "tasks": "/api/v1/tasks?id=&parent= (protected)",
                "progress": "/api/v1/progress?id= (protected)",
                "projects": "/api/v1/projects[/:id][/topics[/:topicId]] (protected)",
                "albums": "/api/albums, /api/album/:albumName, /api/images (protected)",
            }
        }
    }))
}

/// GET /health - Liveness plus database connectivity
pub async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate email format
fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
