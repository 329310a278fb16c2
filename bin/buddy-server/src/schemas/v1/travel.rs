use buddy_app_core::entities::dao::travel::{
    BUDGET_DEFAULT, BUDGET_MAX, BUDGET_MIN, BUDGET_STEP, CITIES, COUNTRIES, MAJOR_LOCATIONS, STATES,
};
use buddy_app_core::entities::{EventType, TravelRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Dashboard form submission.
///
/// Only the widget constraints are enforced: the budget range and the
/// event type enum. Text fields may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct SubmitTravelPlanRequest {
    pub client_name: String,
    pub user_code: String,
    /// `YYYY-MM-DD`.
    pub start_date: NaiveDate,
    /// `YYYY-MM-DD`. Not checked against `start_date`.
    pub end_date: NaiveDate,
    #[validate(range(min = 0, max = 100000))]
    pub budget: i64,
    pub event_type: EventType,
    pub country: String,
    pub state: String,
    pub city: String,
    pub major_location: String,
    #[serde(default)]
    pub preferences: String,
}

impl SubmitTravelPlanRequest {
    pub fn into_record(self) -> TravelRecord {
        TravelRecord {
            client_name: self.client_name,
            user_code: self.user_code,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            event_type: self.event_type,
            country: self.country,
            state: self.state,
            city: self.city,
            major_location: self.major_location,
            preferences: self.preferences,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

/// Choices offered by the dashboard form widgets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TravelPlanOptionsResponse {
    pub event_types: Vec<EventType>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub major_locations: Vec<String>,
    pub budget: BudgetRange,
}

impl TravelPlanOptionsResponse {
    pub fn current() -> Self {
        Self {
            event_types: EventType::all(),
            countries: owned(COUNTRIES),
            states: owned(STATES),
            cities: owned(CITIES),
            major_locations: owned(MAJOR_LOCATIONS),
            budget: BudgetRange {
                min: BUDGET_MIN,
                max: BUDGET_MAX,
                step: BUDGET_STEP,
                default: BUDGET_DEFAULT,
            },
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// A stored plan with its "Travel Plan Overview" lines.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TravelPlanResponse {
    pub record: TravelRecord,
    pub overview: Vec<String>,
}

/// One row of the saved-plans listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedTravelPlanResponse {
    pub record: TravelRecord,
    pub summary: String,
}

impl From<&TravelRecord> for TravelPlanResponse {
    fn from(record: &TravelRecord) -> Self {
        Self {
            record: record.clone(),
            overview: record.summary_lines(),
        }
    }
}

impl From<&TravelRecord> for SavedTravelPlanResponse {
    fn from(record: &TravelRecord) -> Self {
        Self {
            record: record.clone(),
            summary: record.summary_line(),
        }
    }
}
