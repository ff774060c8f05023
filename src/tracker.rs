//! Logging period starts and ends. Keeps the history consistent so the
//! engine can trust what it is given: one ongoing period at most, ends never
//! before starts, and each record's `cycle_length` filled in once the next
//! period begins.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::TrackerError;
use crate::models::{FlowIntensity, PeriodCycle};
use crate::store::CycleStore;

pub async fn start_period(
    store: &dyn CycleStore,
    user_id: Uuid,
    start_date: NaiveDate,
    flow_intensity: Option<FlowIntensity>,
) -> Result<PeriodCycle, TrackerError> {
    let history = store.list_cycles(user_id).await?;

    if let Some(ongoing) = history.iter().find(|c| c.is_ongoing()) {
        return Err(TrackerError::Conflict(format!(
            "A period started on {} is still ongoing; end it before logging a new one",
            ongoing.start_date
        )));
    }

    let previous = match history.iter().max_by_key(|c| c.start_date) {
        Some(previous) => {
            let last_day = previous.end_date.unwrap_or(previous.start_date);
            if start_date <= last_day {
                return Err(TrackerError::InvalidInput(format!(
                    "Start date {} must be after the previous period ({} to {})",
                    start_date, previous.start_date, last_day
                )));
            }
            let mut previous = previous.clone();
            previous.cycle_length = Some((start_date - previous.start_date).num_days() as i32);
            Some(previous)
        }
        None => None,
    };

    let cycle = PeriodCycle::new(user_id, start_date, flow_intensity);
    store.start_period(previous.as_ref(), &cycle).await?;
    tracing::info!("🩸 Period started for {} on {}", user_id, start_date);

    Ok(cycle)
}

pub async fn end_period(
    store: &dyn CycleStore,
    user_id: Uuid,
    end_date: NaiveDate,
) -> Result<PeriodCycle, TrackerError> {
    let history = store.list_cycles(user_id).await?;

    let Some(mut cycle) = history.into_iter().find(|c| c.is_ongoing()) else {
        return Err(TrackerError::NotFound("No ongoing period to end".into()));
    };

    if end_date < cycle.start_date {
        return Err(TrackerError::InvalidInput(format!(
            "End date {} is before the period start {}",
            end_date, cycle.start_date
        )));
    }

    cycle.end_date = Some(end_date);
    cycle.period_length = Some((end_date - cycle.start_date).num_days() as i32 + 1);
    store.update_cycle(&cycle).await?;
    tracing::info!("✅ Period ended for {} on {}", user_id, end_date);

    Ok(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::date;
    use crate::store::MemoryCycleStore;

    #[tokio::test]
    async fn new_start_closes_previous_cycle_length() {
        let store = MemoryCycleStore::new();
        let user = Uuid::new_v4();

        start_period(&store, user, date("2024-01-01"), None).await.unwrap();
        let ended = end_period(&store, user, date("2024-01-05")).await.unwrap();
        assert_eq!(ended.period_length, Some(5));

        start_period(&store, user, date("2024-01-29"), Some(FlowIntensity::Light)).await.unwrap();

        let history = store.list_cycles(user).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].cycle_length, None);
        assert_eq!(history[1].cycle_length, Some(28));
    }

    #[tokio::test]
    async fn cannot_start_while_ongoing() {
        let store = MemoryCycleStore::new();
        let user = Uuid::new_v4();
        start_period(&store, user, date("2024-01-01"), None).await.unwrap();

        let err = start_period(&store, user, date("2024-01-20"), None).await.unwrap_err();
        assert!(matches!(err, TrackerError::Conflict(_)));
    }

    #[tokio::test]
    async fn start_must_follow_previous_period() {
        let store = MemoryCycleStore::new();
        let user = Uuid::new_v4();
        start_period(&store, user, date("2024-01-10"), None).await.unwrap();
        end_period(&store, user, date("2024-01-14")).await.unwrap();

        let err = start_period(&store, user, date("2024-01-12"), None).await.unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn end_requires_an_ongoing_period() {
        let store = MemoryCycleStore::new();
        let err = end_period(&store, Uuid::new_v4(), date("2024-01-05")).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let store = MemoryCycleStore::new();
        let user = Uuid::new_v4();
        start_period(&store, user, date("2024-01-10"), None).await.unwrap();

        let err = end_period(&store, user, date("2024-01-09")).await.unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn concurrent_starts_leave_one_ongoing_period() {
        let store = MemoryCycleStore::new();
        let user = Uuid::new_v4();
        start_period(&store, user, date("2024-01-01"), None).await.unwrap();
        end_period(&store, user, date("2024-01-05")).await.unwrap();

        let (a, b) = tokio::join!(
            start_period(&store, user, date("2024-01-29"), None),
            start_period(&store, user, date("2024-01-30"), None),
        );
        let outcomes = [a.is_ok(), b.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        let rejected = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(rejected, TrackerError::Conflict(_)));

        let history = store.list_cycles(user).await.unwrap();
        assert_eq!(history.iter().filter(|c| c.is_ongoing()).count(), 1);
        let first = history.last().unwrap();
        assert_eq!(first.cycle_length, Some((history[0].start_date - first.start_date).num_days() as i32));
    }
}
