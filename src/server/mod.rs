//! HTTP server for the contacts API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness check
//! GET    /api/status                   - Service status and counters
//!
//! GET    /api/contacts                 - List contacts (sorted by name)
//! POST   /api/contacts                 - Create contact
//! POST   /api/contacts/sync            - Bulk sync
//! POST   /api/contacts/upload          - Avatar upload (multipart)
//! GET    /api/contacts/{id}            - Get contact
//! PUT    /api/contacts/{id}            - Partial update
//! DELETE /api/contacts/{id}            - Delete contact
//! PATCH  /api/contacts/{id}/favorite   - Toggle favorite
//!
//! GET    /uploads/*                    - Uploaded files
//! ```
//!
//! Anything else gets a JSON 404.

pub mod handlers;
pub mod response;
pub mod state;
pub mod upload;

pub use response::{ApiError, ApiResponse, ApiResult};
pub use state::AppState;
pub use upload::UploadedAvatar;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::metrics::HttpTimer;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the contacts collection router.
pub fn contact_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route("/sync", post(handlers::sync_contacts))
        .route(
            "/upload",
            post(upload::upload_avatar)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route(
            "/{id}",
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .route("/{id}/favorite", patch(handlers::toggle_favorite))
}

/// Build the full application router.
pub fn build_app(state: AppState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes;
    let upload_dir = state.config().upload_dir.clone();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        .nest("/api/contacts", contact_routes(max_upload_bytes))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Record request count, latency and server errors.
async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let timer = HttpTimer::new(state.metrics().clone());
    let response = next.run(request).await;
    if response.status().is_server_error() {
        timer.complete_with_error();
    } else {
        timer.complete();
    }
    response
}

/// Bind the configured address and serve until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if the address is invalid, the port cannot be bound or
/// the server fails while running.
pub async fn run_server(state: AppState) -> Result<()> {
    let addr = state.config().socket_addr()?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Contacts API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
