//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use buddy_app_core::chat::ChatService;
use buddy_app_core::entities::SqliteStore;

use crate::config::Config;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Append-only travel plan records.
    pub store: Arc<SqliteStore>,
    /// Live chat sessions and the completion client they share.
    pub chat: Arc<ChatService>,
}
