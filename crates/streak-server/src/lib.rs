pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Streaks
        .route(
            "/api/users/{user_id}/streak",
            get(routes::streaks::get_streak),
        )
        .route(
            "/api/users/{user_id}/completions",
            post(routes::streaks::record_completion),
        )
        // Progress
        .route(
            "/api/users/{user_id}/progress",
            get(routes::progress::get_progress),
        )
        .route(
            "/api/users/{user_id}/activity",
            get(routes::progress::get_activity),
        )
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Open the project under `root` and serve the API on `port`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener).await
}

/// Serve on a pre-bound listener, so callers can read the actual port first
/// (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = {
        let root = root.clone();
        tokio::task::spawn_blocking(move || AppState::open(root)).await??
    };
    let app = build_router(app_state);

    tracing::info!(root = %root.display(), "streak API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
