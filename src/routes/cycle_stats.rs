use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use super::cycle::UserQuery;
use super::AppState;
use crate::engine;
use crate::error::ApiError;
use crate::models::CycleStats;

pub async fn get_cycle_stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CycleStats>, ApiError> {
    let history = state.store.list_cycles(query.user_id).await?;
    Ok(Json(engine::cycle_stats(&history)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle-stats", get(get_cycle_stats))
        .with_state(state)
}
