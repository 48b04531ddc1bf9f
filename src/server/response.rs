//! Response envelope and HTTP error mapping.
//!
//! Every JSON response uses the same envelope:
//! `{success, message, count?, data?, errors?}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::{ContactError, UniqueField};

/// JSON envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
            data: Some(data),
            errors: None,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Failed response with optional itemized errors.
    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: None,
            data: None,
            errors,
        }
    }
}

/// Result type for JSON handlers.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Build a successful handler result.
pub fn respond<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> ApiResult<T> {
    Ok((status, Json(body)))
}

/// HTTP-level error type. All route handlers return `Result<_, ApiError>`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Contact operation failed.
    #[error(transparent)]
    Contact(#[from] ContactError),

    /// Malformed request (body, form, upload).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown route.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected server-side failure outside the store.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<Vec<String>>) {
        match self {
            Self::Contact(err) => match err {
                ContactError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    Some(errors.iter().map(|e| e.message.clone()).collect()),
                ),
                ContactError::InvalidId(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid contact ID".to_string(), None)
                }
                ContactError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "Contact not found".to_string(), None)
                }
                ContactError::Duplicate { field, .. } => {
                    let message = match field {
                        UniqueField::Phone => "Phone number is already registered",
                        UniqueField::Email => "Email is already registered",
                    };
                    (StatusCode::CONFLICT, message.to_string(), None)
                }
                ContactError::FavoriteLimit { limit } => (
                    StatusCode::BAD_REQUEST,
                    format!("Favorite limit reached: at most {} contacts", limit),
                    None,
                ),
                ContactError::InvalidBatch(reason) => {
                    (StatusCode::BAD_REQUEST, reason.clone(), None)
                }
                ContactError::Store(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    None,
                ),
            },
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone(), None),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Endpoint not found".to_string(), None),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = self.parts();

        // Details stay in the log; clients only see the generic message
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ApiResponse::failure(message, errors))).into_response()
    }
}

/// Unwrap a JSON body, turning extractor rejections into envelope errors.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    })
}
