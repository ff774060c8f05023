use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;
use crate::models::{FlowIntensity, PeriodCycle};
use crate::tracker;

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewPeriod {
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub flow_intensity: Option<FlowIntensity>,
}

#[derive(Deserialize)]
pub struct EndPeriod {
    pub user_id: Uuid,
    pub end_date: NaiveDate,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle", post(start_period))
        .route("/cycle/end", patch(end_period))
        .route("/cycles", get(list_cycles))
        .with_state(state)
}

async fn start_period(
    State(state): State<AppState>,
    Json(body): Json<NewPeriod>,
) -> Result<(StatusCode, Json<PeriodCycle>), ApiError> {
    let cycle = tracker::start_period(
        state.store.as_ref(),
        body.user_id,
        body.start_date,
        body.flow_intensity,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

async fn end_period(
    State(state): State<AppState>,
    Json(body): Json<EndPeriod>,
) -> Result<Json<PeriodCycle>, ApiError> {
    let cycle = tracker::end_period(state.store.as_ref(), body.user_id, body.end_date).await?;
    Ok(Json(cycle))
}

async fn list_cycles(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<PeriodCycle>>, ApiError> {
    let cycles = state.store.list_cycles(params.user_id).await?;
    Ok(Json(cycles))
}
