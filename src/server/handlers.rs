//! HTTP handlers for the contacts collection and operational endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::response::{json_body, respond, ApiError, ApiResponse, ApiResult};
use super::state::AppState;
use crate::metrics::MetricsSummary;
use crate::models::{Contact, DeletedContact, FavoriteStatus};
use crate::services::SyncSummary;

/// `GET /api/contacts` - all contacts sorted by name.
pub async fn list_contacts(State(state): State<AppState>) -> ApiResult<Vec<Contact>> {
    let contacts = state.service().list_contacts().await?;
    let count = contacts.len();
    respond(
        StatusCode::OK,
        ApiResponse::ok("All contacts retrieved", contacts).with_count(count),
    )
}

/// `GET /api/contacts/{id}`
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    let contact = state.service().get_contact(&id).await?;
    respond(StatusCode::OK, ApiResponse::ok("Contact retrieved", contact))
}

/// `POST /api/contacts`
pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Contact> {
    let payload = json_body(payload)?;
    let contact = state.service().create_contact(payload).await?;
    respond(StatusCode::CREATED, ApiResponse::ok("Contact created", contact))
}

/// `PUT /api/contacts/{id}` - partial update.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Contact> {
    let payload = json_body(payload)?;
    let contact = state.service().update_contact(&id, payload).await?;
    respond(StatusCode::OK, ApiResponse::ok("Contact updated", contact))
}

/// `DELETE /api/contacts/{id}`
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeletedContact> {
    let deleted = state.service().delete_contact(&id).await?;
    respond(StatusCode::OK, ApiResponse::ok("Contact deleted", deleted))
}

/// `PATCH /api/contacts/{id}/favorite`
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<FavoriteStatus> {
    let status = state.service().toggle_favorite(&id).await?;
    let message = if status.is_favorite {
        "Contact added to favorites"
    } else {
        "Contact removed from favorites"
    };
    respond(StatusCode::OK, ApiResponse::ok(message, status))
}

/// `POST /api/contacts/sync`
pub async fn sync_contacts(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SyncSummary> {
    let payload = json_body(payload)?;
    let summary = state.service().sync_contacts(payload).await?;
    let message = format!(
        "Sync completed: {} added, {} skipped",
        summary.added, summary.skipped
    );
    respond(StatusCode::OK, ApiResponse::ok(message, summary))
}

/// Body of `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub message: &'static str,
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<usize>,
    pub metrics: MetricsSummary,
}

/// `GET /api/status` - service and store health with counters.
pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    let contacts = match state.service().contact_count().await {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::warn!(error = %err, "Store unavailable for status check");
            None
        }
    };

    Json(StatusReport {
        message: "Contacts API is running",
        store: if contacts.is_some() {
            "connected"
        } else {
            "unavailable"
        },
        contacts,
        metrics: state.metrics().summary(),
    })
}

/// Liveness check. Does not touch the store.
pub async fn health() -> &'static str {
    "ok"
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
