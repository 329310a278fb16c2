use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

/// Lowest budget the dashboard slider allows.
pub const BUDGET_MIN: i64 = 0;
/// Highest budget the dashboard slider allows.
pub const BUDGET_MAX: i64 = 100_000;
pub const BUDGET_STEP: i64 = 1_000;
pub const BUDGET_DEFAULT: i64 = 50_000;

pub const COUNTRIES: &[&str] = &["India", "USA", "France", "Japan", "Other"];
pub const STATES: &[&str] = &["Maharashtra", "California", "Tokyo", "Other"];
pub const CITIES: &[&str] = &["Mumbai", "Los Angeles", "Paris", "Other"];
pub const MAJOR_LOCATIONS: &[&str] = &["Beach", "Mountain", "Desert", "Other"];

/// Purpose of the trip, as offered by the dashboard's radio group.
///
/// The string forms are what lands in the `event_type` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum EventType {
    Wedding,
    Shopping,
    #[serde(rename = "Official Meeting")]
    #[strum(serialize = "Official Meeting")]
    OfficialMeeting,
    #[serde(rename = "Other Events")]
    #[strum(serialize = "Other Events")]
    OtherEvents,
    Vacation,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Every event type in the order the form lists them.
    pub fn all() -> Vec<EventType> {
        EventType::iter().collect()
    }
}

/// A single row in the `travel_data` table.
///
/// Field order matches the column order of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TravelRecord {
    pub client_name: String,
    pub user_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rupees, within [`BUDGET_MIN`]..=[`BUDGET_MAX`].
    pub budget: i64,
    pub event_type: EventType,
    pub country: String,
    pub state: String,
    pub city: String,
    pub major_location: String,
    pub preferences: String,
}

impl TravelRecord {
    /// `(label, value)` pairs in column order, as shown in the travel plan
    /// overview.
    pub fn labelled_fields(&self) -> [(&'static str, String); 11] {
        [
            ("Client Name", self.client_name.clone()),
            ("User Code", self.user_code.clone()),
            ("Start Date", self.start_date.to_string()),
            ("End Date", self.end_date.to_string()),
            ("Budget", format!("₹{}", self.budget)),
            ("Event Type", self.event_type.to_string()),
            ("Country", self.country.clone()),
            ("State", self.state.clone()),
            ("City", self.city.clone()),
            ("Major Location", self.major_location.clone()),
            ("Preferences", self.preferences.clone()),
        ]
    }

    /// One `Label: value` line per field.
    pub fn summary_lines(&self) -> Vec<String> {
        self.labelled_fields()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect()
    }

    /// All fields on a single line, used by the saved-plans listing.
    pub fn summary_line(&self) -> String {
        self.summary_lines().join(", ")
    }
}
