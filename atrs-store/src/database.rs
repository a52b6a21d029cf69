use atrs_core::{ReferenceRepository, StoreError};
use atrs_shared::PeakTime;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

use crate::app_config::DatabaseConfig;
use crate::member_repo::PgMemberRepository;
use crate::reservation_repo::PgReservationStore;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    pub fn reservation_store(&self) -> PgReservationStore {
        PgReservationStore::new(self.pool.clone())
    }

    pub fn member_repository(&self) -> PgMemberRepository {
        PgMemberRepository::new(self.pool.clone())
    }
}

#[derive(sqlx::FromRow)]
struct PeakTimeRow {
    start_date: NaiveDate,
    end_date: NaiveDate,
    peak_ratio: i32,
}

#[async_trait]
impl ReferenceRepository for DbClient {
    async fn load_peak_times(&self) -> Result<Vec<PeakTime>, StoreError> {
        let rows: Vec<PeakTimeRow> = sqlx::query_as(
            "SELECT start_date, end_date, peak_ratio FROM peak_time ORDER BY start_date",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        info!("Loaded {} peak time periods", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| PeakTime {
                start_date: row.start_date,
                end_date: row.end_date,
                peak_ratio: row.peak_ratio,
            })
            .collect())
    }
}
