pub mod chat;
pub mod travel;

use crate::state::AppState;
use utoipa::OpenApi;

use axum::Router;
use std::sync::Arc;

/// Routes nested under `/v1`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(travel::router())
        .merge(chat::router())
}

#[derive(OpenApi)]
#[openapi()]
pub struct V1Api;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = V1Api::openapi();
    doc.merge(travel::TravelApi::openapi());
    doc.merge(chat::ChatApi::openapi());
    doc
}
