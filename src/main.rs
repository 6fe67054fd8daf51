//! Care2Share Swipe Service
//!
//! A REST API for a campus meal-swipe donation program. Tracks user
//! accounts keyed by UNI, swipe transfer transactions, a per-UNI swipe
//! ledger, and a best-effort donor points ledger.

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use care2share_backend::api;
use care2share_backend::config::{Config, StorageBackend};
use care2share_backend::state::AppState;
use care2share_backend::store::{MemoryStore, SqliteStore, Store};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // Build the storage backend and application state
    let store: Arc<dyn Store> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Sqlite => Arc::new(SqliteStore::new(&config.storage.db_path).await?),
    };
    let app_state = AppState::new(store, config.updates.async_delay());

    // Build our application with routes
    let app = Router::new()
        // Greetings and health check
        .route("/", get(root_greeting))
        .route("/hello/:name", get(hello_name))
        .route("/health", get(health_check))
        // User account API
        .route(
            "/users/",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/users/:uni",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/user_swipes/update_async",
            put(api::users::update_swipes_async),
        )
        // Swipe transaction API
        .route("/swipe/", post(api::swipes::create_swipe))
        .route(
            "/swipe/:swipe_id",
            get(api::swipes::get_swipe).put(api::swipes::update_swipe),
        )
        // Donor points API
        .route(
            "/user_points/update_async",
            put(api::points::update_points_async),
        )
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Callers come from any campus origin
        .with_state(app_state);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Server running on http://{}", addr);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn root_greeting() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the Care2Share swipe service!".to_string(),
        status: "ok".to_string(),
    })
}

async fn hello_name(Path(name): Path<String>) -> Json<HelloResponse> {
    Json(HelloResponse {
        message: format!("Hello {} from the Care2Share swipe service!", name),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
