use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use devlog_api::database::manager::DatabaseManager;
use devlog_api::database::schema::ensure_schema;
use devlog_api::handlers;
use devlog_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = devlog_api::config::config();
    tracing::info!("Starting devlog API in {:?} mode", config.environment);

    // Best-effort schema bootstrap. The server still comes up without a
    // database; /health reports degraded and data endpoints return 503.
    match DatabaseManager::pool().await {
        Ok(pool) => {
            if let Err(e) = ensure_schema(&pool).await {
                tracing::error!("Schema bootstrap failed: {}", e);
            }
        }
        Err(e) => tracing::warn!("Database unavailable at startup: {}", e),
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("DEVLOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("devlog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::auth::root))
        .route("/health", get(handlers::public::auth::health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API (JWT required)
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use devlog_api::handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router {
    use axum::routing::post;
    use devlog_api::handlers::protected::{albums, auth, progress, projects, tasks, topics};

    Router::new()
        // Session introspection
        .route("/api/auth/whoami", get(auth::whoami))
        // Tasks (query params: id, parent)
        .route(
            "/api/v1/tasks",
            get(tasks::get)
                .post(tasks::post)
                .put(tasks::put)
                .delete(tasks::delete),
        )
        // Daily progress entries (query param: id)
        .route(
            "/api/v1/progress",
            get(progress::get)
                .post(progress::post)
                .put(progress::put)
                .delete(progress::delete),
        )
        // Projects and their topics
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        // POST on the project itself also appends a topic, a quirk clients rely on
        .route(
            "/api/v1/projects/:id",
            get(projects::detail)
                .post(topics::create)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/v1/projects/:id/topics", post(topics::create))
        .route(
            "/api/v1/projects/:id/topics/:topic_id",
            axum::routing::put(topics::update).delete(topics::delete),
        )
        // Albums and image uploads
        .route("/api/albums", get(albums::list))
        .route("/api/album/:album_name", get(albums::get))
        .route("/api/images", post(albums::upload))
        .route_layer(from_fn(jwt_auth_middleware))
}
