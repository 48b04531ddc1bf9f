//! Avatar image upload.
//!
//! Accepts a single multipart file field named `avatar`, stores it under the
//! configured upload directory and returns a publicly reachable URL served by
//! the `/uploads` route.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use chrono::Utc;
use serde::Serialize;

use super::response::{respond, ApiError, ApiResponse, ApiResult};
use super::state::AppState;

/// Multipart field that carries the image.
pub const AVATAR_FIELD: &str = "avatar";

/// Accepted image types and the extension stored for each.
const ALLOWED_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
];

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedAvatar {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mimetype: String,
}

fn extension_for(mimetype: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(mimetype))
        .map(|(_, ext)| *ext)
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::BadRequest(format!(
        "File is too large, maximum size is {} bytes",
        max_bytes
    ))
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

/// Base URL for links to stored files.
///
/// Uses the configured public URL, else the request's `Host` header.
fn public_base(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.config().public_base_url {
        return base.clone();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}", host)
}

/// `POST /api/contacts/upload`
pub async fn upload_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadedAvatar> {
    let mut multipart = multipart.map_err(|rejection| {
        ApiError::BadRequest(format!("Expected a multipart form: {}", rejection.body_text()))
    })?;
    let max_bytes = state.config().max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let mimetype = field.content_type().unwrap_or_default().to_string();
        let extension = extension_for(&mimetype).ok_or_else(|| {
            ApiError::BadRequest("Only JPEG, PNG and GIF images are allowed".to_string())
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(too_large(max_bytes));
        }

        let filename = format!(
            "avatar-{}-{:08x}.{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>(),
            extension
        );
        let dir = &state.config().upload_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::Internal(format!("create {}: {}", dir.display(), e)))?;
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| ApiError::Internal(format!("write {}: {}", filename, e)))?;

        tracing::info!(filename = %filename, size = data.len(), "Avatar uploaded");

        let url = format!("{}/uploads/{}", public_base(&state, &headers), filename);
        return respond(
            StatusCode::OK,
            ApiResponse::ok(
                "File uploaded",
                UploadedAvatar {
                    url,
                    filename,
                    size: data.len(),
                    mimetype,
                },
            ),
        );
    }

    Err(ApiError::BadRequest(format!(
        "No file found in the \"{}\" field",
        AVATAR_FIELD
    )))
}
