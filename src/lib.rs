//! Cycle tracking backend: period logging plus the cycle phase engine that
//! turns a user's history into today's phase and the next-period prediction.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tracker;

pub use config::AppConfig;
pub use error::{ApiError, EngineError};
pub use routes::{app, AppState};
