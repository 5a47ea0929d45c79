// HTTP route layer
// Composes ingestion, retrieval, and persistence behind axum routes


pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;

pub use state::AppState;

/// Build the application router over shared state.
#[inline]
pub fn router(state: Arc<AppState>) -> Router {
    // The source system fronts a browser SPA, so CORS stays fully open
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/chatbot", post(handlers::chat::chatbot))
        .route("/chat", post(handlers::chat::chat))
        .route("/uploadDocuments", post(handlers::uploads::upload_documents))
        .route(
            "/uploadJsonDocument",
            post(handlers::uploads::upload_json_document),
        )
        .route("/uploadText", post(handlers::uploads::upload_text))
        .route("/uploadChats", post(handlers::uploads::upload_chats))
        .route("/api/users/save", post(handlers::users::save))
        .route("/api/users/all", get(handlers::users::all))
        .route("/api/users/check", post(handlers::users::check))
        .route("/api/companies/save", post(handlers::companies::save))
        .route("/api/companies/all", get(handlers::companies::all))
        .route("/api/companies/check", post(handlers::companies::check))
        .route("/api/companies/chat", post(handlers::companies::chat))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until ctrl-c.
#[inline]
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server bind address")?;

    let state = Arc::new(AppState::new(config).await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
