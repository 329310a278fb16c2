use std::future::Future;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::entities::{EventType, SqliteStore, TravelRecord};
use crate::error::StorageError;

/// Column names of `travel_data`, in table order.
pub const TRAVEL_COLUMNS: [&str; 11] = [
    "client_name",
    "user_code",
    "start_date",
    "end_date",
    "budget",
    "event_type",
    "country",
    "state",
    "city",
    "major_location",
    "preferences",
];

const CREATE_TRAVEL_DATA: &str = "CREATE TABLE IF NOT EXISTS travel_data \
     (client_name TEXT, user_code TEXT, start_date TEXT, end_date TEXT, \
      budget INTEGER, event_type TEXT, country TEXT, \
      state TEXT, city TEXT, major_location TEXT, preferences TEXT)";

type TravelRow = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
);

/// Append-only, read-all store of travel plan submissions.
pub trait TravelStore: Send + Sync + 'static {
    /// Create `travel_data` if it does not exist. Idempotent.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Append one row.
    fn insert(&self, record: TravelRecord)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Every row, oldest first. An empty table yields an empty vector.
    fn list_all(&self) -> impl Future<Output = Result<Vec<TravelRecord>, StorageError>> + Send;
}

impl TravelStore for SqliteStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TRAVEL_DATA).execute(&self.pool).await?;

        let found: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('travel_data') ORDER BY cid")
                .fetch_all(&self.pool)
                .await?;
        let found: Vec<String> = found.into_iter().map(|(name,)| name).collect();
        if found.iter().map(String::as_str).ne(TRAVEL_COLUMNS) {
            return Err(StorageError::IncompatibleSchema { found });
        }
        Ok(())
    }

    async fn insert(&self, record: TravelRecord) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO travel_data VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)")
            .bind(&record.client_name)
            .bind(&record.user_code)
            .bind(record.start_date.to_string())
            .bind(record.end_date.to_string())
            .bind(record.budget)
            .bind(record.event_type.as_str())
            .bind(&record.country)
            .bind(&record.state)
            .bind(&record.city)
            .bind(&record.major_location)
            .bind(&record.preferences)
            .execute(&self.pool)
            .await?;
        debug!(client_name = %record.client_name, "travel record inserted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<TravelRecord>, StorageError> {
        let rows: Vec<TravelRow> = sqlx::query_as(
            "SELECT rowid, client_name, user_code, start_date, end_date, budget, event_type, \
                    country, state, city, major_location, preferences \
             FROM travel_data ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row(row: TravelRow) -> Result<TravelRecord, StorageError> {
    let (
        rowid,
        client_name,
        user_code,
        start_date,
        end_date,
        budget,
        event_type,
        country,
        state,
        city,
        major_location,
        preferences,
    ) = row;

    Ok(TravelRecord {
        client_name,
        user_code,
        start_date: parse_date(rowid, "start_date", start_date)?,
        end_date: parse_date(rowid, "end_date", end_date)?,
        budget,
        event_type: EventType::from_str(&event_type).map_err(|_| StorageError::Decode {
            row: rowid,
            column: "event_type",
            value: event_type.clone(),
        })?,
        country,
        state,
        city,
        major_location,
        preferences,
    })
}

fn parse_date(row: i64, column: &'static str, raw: String) -> Result<NaiveDate, StorageError> {
    raw.parse::<NaiveDate>()
        .map_err(|_| StorageError::Decode { row, column, value: raw })
}
