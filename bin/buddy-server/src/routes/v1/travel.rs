//! Travel plan routes: the dashboard form and the saved-plans listing.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use buddy_app_core::entities::TravelStore;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::ServerError;
use crate::schemas::v1::travel::{
    BudgetRange, SavedTravelPlanResponse, SubmitTravelPlanRequest, TravelPlanOptionsResponse,
    TravelPlanResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_options, submit_travel_plan, list_travel_plans),
    components(schemas(
        SubmitTravelPlanRequest,
        TravelPlanOptionsResponse,
        BudgetRange,
        TravelPlanResponse,
        SavedTravelPlanResponse
    ))
)]
pub struct TravelApi;

/// Register travel plan routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/travel-plans/options", get(get_options))
        .route("/travel-plans", get(list_travel_plans).post(submit_travel_plan))
}

#[utoipa::path(
    get,
    path = "/v1/travel-plans/options",
    tag = "travel-plans",
    responses(
        (status = 200, description = "Form widget choices", body = TravelPlanOptionsResponse),
    )
)]
pub async fn get_options() -> Json<TravelPlanOptionsResponse> {
    Json(TravelPlanOptionsResponse::current())
}

/// Save one dashboard submission and echo its overview.
#[utoipa::path(
    post,
    path = "/v1/travel-plans",
    tag = "travel-plans",
    request_body = SubmitTravelPlanRequest,
    responses(
        (status = 200, description = "Travel plan saved", body = TravelPlanResponse),
        (status = 400, description = "Budget out of range or malformed body"),
        (status = 500, description = "Record store unavailable"),
    )
)]
pub async fn submit_travel_plan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitTravelPlanRequest>, JsonRejection>,
) -> Result<Json<TravelPlanResponse>, ServerError> {
    let Json(req) = payload?;
    req.validate()?;

    let record = req.into_record();
    state.store.insert(record.clone()).await?;
    info!(event_type = %record.event_type, country = %record.country, "travel plan saved");

    Ok(Json(TravelPlanResponse::from(&record)))
}

/// Every saved plan, oldest first.
#[utoipa::path(
    get,
    path = "/v1/travel-plans",
    tag = "travel-plans",
    responses(
        (status = 200, description = "Saved travel plans", body = Vec<SavedTravelPlanResponse>),
        (status = 500, description = "Record store unavailable"),
    )
)]
pub async fn list_travel_plans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SavedTravelPlanResponse>>, ServerError> {
    let records = state.store.list_all().await?;
    Ok(Json(records.iter().map(SavedTravelPlanResponse::from).collect()))
}
