//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON body
//! `{"error": "..."}` with an appropriate status code.
//!
//! Storage errors are logged in full; clients only see a
//! generic message so file paths and SQL never leak.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use buddy_app_core::{ChatError, StorageError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the travel record store.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The completion backend is not configured.
    #[error("backend not ready: {0}")]
    BackendNotReady(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::BackendNotReady(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),

            ServerError::Storage(e) => {
                error!(error = %e, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "travel records are unavailable".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<ChatError> for ServerError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(v) => ServerError::BadRequest(v.to_string()),
            ChatError::Auth(a) => ServerError::BackendNotReady(a.to_string()),
            ChatError::SessionNotFound(id) => {
                ServerError::NotFound(format!("chat session {id} not found"))
            }
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ServerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServerError::BadRequest(errors.to_string())
    }
}
