use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::CycleStore;
use crate::error::StoreError;
use crate::models::{FlowIntensity, PeriodCycle};

#[derive(sqlx::FromRow)]
struct CycleRow {
    id: Uuid,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    cycle_length: Option<i32>,
    period_length: Option<i32>,
    flow_intensity: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CycleRow> for PeriodCycle {
    fn from(row: CycleRow) -> Self {
        let flow_intensity = row.flow_intensity.and_then(|raw| match raw.parse::<FlowIntensity>() {
            Ok(flow) => Some(flow),
            Err(e) => {
                tracing::warn!("⚠️ Ignoring stored flow intensity for {}: {}", row.id, e);
                None
            }
        });
        PeriodCycle {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            cycle_length: row.cycle_length,
            period_length: row.period_length,
            flow_intensity,
            created_at: row.created_at,
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

fn insert_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        tracing::error!("❌ DB insert failed: {}", db_err.message());
        if let Some(constraint) = db_err.constraint() {
            tracing::info!("🔒 Constraint violated: {}", constraint);
        }
        if is_unique_violation(db_err.code().as_deref()) {
            return StoreError::Conflict(
                db_err.constraint().unwrap_or("period_cycles").to_string(),
            );
        }
    }
    StoreError::Database(e)
}

#[derive(Clone)]
pub struct PgCycleStore {
    pool: PgPool,
}

impl PgCycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CycleStore for PgCycleStore {
    async fn list_cycles(&self, user_id: Uuid) -> Result<Vec<PeriodCycle>, StoreError> {
        let rows = sqlx::query_as::<_, CycleRow>(
            r#"
            SELECT id, user_id, start_date, end_date, cycle_length, period_length,
                   flow_intensity, created_at
            FROM period_cycles
            WHERE user_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PeriodCycle::from).collect())
    }

    async fn start_period(&self, previous: Option<&PeriodCycle>, cycle: &PeriodCycle) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(previous) = previous {
            let result = sqlx::query("UPDATE period_cycles SET cycle_length = $2 WHERE id = $1")
                .bind(previous.id)
                .bind(previous.cycle_length)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(previous.id));
            }
        }

        sqlx::query(
            "INSERT INTO period_cycles (id, user_id, start_date, end_date, cycle_length, period_length, flow_intensity, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(cycle.id)
        .bind(cycle.user_id)
        .bind(cycle.start_date)
        .bind(cycle.end_date)
        .bind(cycle.cycle_length)
        .bind(cycle.period_length)
        .bind(cycle.flow_intensity.map(|f| f.as_str()))
        .bind(cycle.created_at)
        .execute(&mut *tx)
        .await
        .map_err(insert_error)?;

        // dropping `tx` on any early return above rolls the update back
        tx.commit().await?;
        Ok(())
    }

    async fn update_cycle(&self, cycle: &PeriodCycle) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE period_cycles SET end_date = $2, cycle_length = $3, period_length = $4 WHERE id = $1",
        )
        .bind(cycle.id)
        .bind(cycle.end_date)
        .bind(cycle.cycle_length)
        .bind(cycle.period_length)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(cycle.id));
        }
        Ok(())
    }
}
