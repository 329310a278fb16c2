//! Record store.
//!
//! [`TravelStore`] defines the interface for the append-only `travel_data`
//! table. The default implementation is [`SqliteStore`]; to move to another
//! database, implement [`TravelStore`] for a new type and change the concrete
//! type the server holds in its state.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod dao;
pub mod travel;

pub use dao::{EventType, TravelRecord};
pub use travel::TravelStore;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StorageError;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and make sure the
    /// `travel_data` table exists.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://travel_buddy.db"`.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        debug!(%url, "sqlite pool opened");
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// A private in-memory database.
    ///
    /// Every connection to `:memory:` is a distinct database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Close every pooled connection; pending acquisitions fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn connect_fails_when_parent_directory_is_missing() {
        let dir = std::env::temp_dir().join(format!("buddy-missing-{}", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", dir.join("travel_buddy.db").display());

        let err = SqliteStore::connect(&url).await.unwrap_err();

        assert!(matches!(err, StorageError::Database(_)), "got {err}");
        assert!(!dir.exists());
    }
}
