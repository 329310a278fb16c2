//! buddy-app-core – domain logic shared by every Travel Buddy front end.
//!
//! - [`entities`]: the append-only `travel_data` record store.
//! - [`chat`]: per-session transcripts, the session registry and the turn
//!   orchestration that talks to the completion backend.
//! - [`completion`]: the inference API client.

pub mod chat;
pub mod completion;
pub mod entities;
pub mod error;

pub use error::{AuthError, ChatError, CompletionError, StorageError, ValidationError};
