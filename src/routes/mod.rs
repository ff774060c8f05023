use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::store::CycleStore;

pub mod cycle;
pub mod cycle_stats;
pub mod phase;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CycleStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CycleStore>) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(cycle::routes(state.clone()))
        .merge(phase::routes(state.clone()))
        .merge(cycle_stats::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
        .layer(TraceLayer::new_for_http())
}
