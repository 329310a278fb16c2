//! Error taxonomy for the Travel Buddy core.
//!
//! Every boundary call returns one of these explicitly; nothing is allowed to
//! escape as a panic. The HTTP layer maps them to status codes.

use thiserror::Error;
use uuid::Uuid;

/// Schema creation, write, or read failure in the record store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Propagated from sqlx (unreachable file, locked database, bad SQL, …).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `travel_data` exists but its columns are not the expected eleven.
    #[error("travel_data has incompatible columns: {found:?}")]
    IncompatibleSchema { found: Vec<String> },

    /// A stored row could not be turned back into a `TravelRecord`.
    #[error("row {row} has an unreadable {column}: {value:?}")]
    Decode {
        row: i64,
        column: &'static str,
        value: String,
    },
}

/// Rejected user input; raised before anything is mutated or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message must not be empty")]
    EmptyMessage,
}

/// The completion backend could not be initialised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no API key configured for the completion backend (set GROQ_API_KEY)")]
    MissingApiKey,

    #[error("failed to initialise completion client: {0}")]
    ClientInit(String),
}

/// A completion request failed. Callers render this instead of crashing.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Connection refused, DNS failure, TLS error, dropped connection, …
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 2xx but the payload had no usable reply.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

/// Errors that abort a chat turn before a reply can be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("chat session {0} not found")]
    SessionNotFound(Uuid),
}
