//! Chatbot routes.
//!
//! Sessions live in memory only. A turn whose completion fails still returns
//! 200 with the fallback reply; only a missing API key (503), empty input
//! (400) or an unknown session (404) fail the request.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use buddy_app_core::chat::ChatMessage;
use serde_json::{json, Value};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ServerError;
use crate::schemas::v1::chat::{
    SendMessageRequest, SessionListResponse, SessionResponse, TurnResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_session, list_sessions, list_messages, send_message, delete_session),
    components(schemas(
        SessionResponse,
        SessionListResponse,
        SendMessageRequest,
        TurnResponse,
        ChatMessage
    ))
)]
pub struct ChatApi;

/// Register chat session routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/sessions", get(list_sessions).post(create_session))
        .route("/chat/sessions/{id}", delete(delete_session))
        .route("/chat/sessions/{id}/messages", get(list_messages).post(send_message))
}

/// Start a session seeded with the greeting.
#[utoipa::path(
    post,
    path = "/v1/chat/sessions",
    tag = "chat",
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ServerError> {
    let id = state.chat.create_session();
    let messages = state.chat.messages(&id).await?;
    Ok(Json(SessionResponse { id, messages }))
}

#[utoipa::path(
    get,
    path = "/v1/chat/sessions",
    tag = "chat",
    responses(
        (status = 200, description = "Live session ids", body = SessionListResponse),
    )
)]
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionListResponse> {
    Json(SessionListResponse { sessions: state.chat.sessions().list() })
}

#[utoipa::path(
    get,
    path = "/v1/chat/sessions/{id}/messages",
    tag = "chat",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Transcript, oldest first", body = SessionResponse),
        (status = 404, description = "Unknown session"),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ServerError> {
    let messages = state.chat.messages(&id).await?;
    Ok(Json(SessionResponse { id, messages }))
}

/// Run one chat turn.
#[utoipa::path(
    post,
    path = "/v1/chat/sessions/{id}/messages",
    tag = "chat",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Reply, or fallback reply with error", body = TurnResponse),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Unknown session"),
        (status = 503, description = "Completion backend not configured"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ServerError> {
    let Json(req) = payload?;
    let outcome = state.chat.respond(&id, &req.content).await?;
    Ok(Json(outcome.into()))
}

/// End a session; its transcript is discarded.
#[utoipa::path(
    delete,
    path = "/v1/chat/sessions/{id}",
    tag = "chat",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session deleted", body = Value),
        (status = 404, description = "Unknown session"),
    )
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServerError> {
    state.chat.close_session(&id)?;
    Ok(Json(json!({ "deleted": true })))
}
