use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::engine::{self, OutputMode};
use crate::error::ApiError;
use crate::models::{CurrentCycleInfo, CurrentPhase};

#[derive(Deserialize)]
pub struct PhaseQuery {
    pub user_id: Uuid,
    pub date: Option<String>,
}

impl PhaseQuery {
    /// `date` when given, otherwise today in UTC.
    fn reference_date(&self) -> Result<NaiveDate, ApiError> {
        match self.date.as_deref() {
            Some(raw) => Ok(engine::parse_reference_date(raw)?),
            None => Ok(chrono::Utc::now().date_naive()),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle/current-info", get(get_current_info))
        .route("/cycle/current-phase", get(get_current_phase))
        .with_state(state)
}

async fn get_current_info(
    State(state): State<AppState>,
    Query(params): Query<PhaseQuery>,
) -> Result<Json<CurrentCycleInfo>, ApiError> {
    let reference = params.reference_date()?;
    let history = state.store.list_cycles(params.user_id).await?;
    Ok(Json(engine::current_cycle_info(&history, reference, OutputMode::Extended)))
}

async fn get_current_phase(
    State(state): State<AppState>,
    Query(params): Query<PhaseQuery>,
) -> Result<Json<Option<CurrentPhase>>, ApiError> {
    let reference = params.reference_date()?;
    let history = state.store.list_cycles(params.user_id).await?;
    Ok(Json(engine::current_phase(&history, reference)))
}
