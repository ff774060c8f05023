//! Where period history lives. Handlers load a user's records through
//! [`CycleStore`] and hand the plain slice to the engine.

mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::PeriodCycle;

pub use postgres::PgCycleStore;

#[async_trait]
pub trait CycleStore: Send + Sync {
    /// All records for `user_id`, newest start first.
    async fn list_cycles(&self, user_id: Uuid) -> Result<Vec<PeriodCycle>, StoreError>;

    /// Saves `previous` (with its now-known `cycle_length`) and inserts
    /// `cycle` as one unit. Fails with [`StoreError::Conflict`] when the user
    /// already has an ongoing period or a period starting the same day, and
    /// leaves `previous` untouched in that case.
    async fn start_period(&self, previous: Option<&PeriodCycle>, cycle: &PeriodCycle) -> Result<(), StoreError>;

    /// Overwrites end date and lengths of an existing record.
    async fn update_cycle(&self, cycle: &PeriodCycle) -> Result<(), StoreError>;
}

/// Process-local store for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryCycleStore {
    cycles: RwLock<HashMap<Uuid, PeriodCycle>>,
}

impl MemoryCycleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CycleStore for MemoryCycleStore {
    async fn list_cycles(&self, user_id: Uuid) -> Result<Vec<PeriodCycle>, StoreError> {
        let cycles = self.cycles.read().await;
        let mut rows: Vec<PeriodCycle> = cycles
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn start_period(&self, previous: Option<&PeriodCycle>, cycle: &PeriodCycle) -> Result<(), StoreError> {
        let mut cycles = self.cycles.write().await;

        let clash = cycles
            .values()
            .filter(|c| c.user_id == cycle.user_id)
            .find(|c| c.is_ongoing() || c.start_date == cycle.start_date);
        if let Some(existing) = clash {
            return Err(StoreError::Conflict(format!(
                "period starting {} already open or logged for {}",
                existing.start_date, cycle.user_id
            )));
        }

        if let Some(previous) = previous {
            let existing = cycles
                .get_mut(&previous.id)
                .ok_or(StoreError::NotFound(previous.id))?;
            existing.cycle_length = previous.cycle_length;
        }
        cycles.insert(cycle.id, cycle.clone());
        Ok(())
    }

    async fn update_cycle(&self, cycle: &PeriodCycle) -> Result<(), StoreError> {
        let mut cycles = self.cycles.write().await;
        match cycles.get_mut(&cycle.id) {
            Some(existing) => {
                existing.end_date = cycle.end_date;
                existing.cycle_length = cycle.cycle_length;
                existing.period_length = cycle.period_length;
                Ok(())
            }
            None => Err(StoreError::NotFound(cycle.id)),
        }
    }
}
