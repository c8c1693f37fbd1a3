//! PostgreSQL-backed `MetricRepository` using Diesel.
//!
//! Reads order by `recorded_at DESC, id DESC`, served by the
//! `(user_id, recorded_at desc, id desc)` index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MetricRepository, MetricRepositoryError};
use crate::domain::{Metric, MetricReading, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MetricRow, NewMetricRow};
use super::pool::{DbPool, PoolError};
use super::schema::metrics;

/// Diesel-backed implementation of the metric repository port.
#[derive(Clone)]
pub struct DieselMetricRepository {
    pool: DbPool,
}

impl DieselMetricRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MetricRepositoryError {
    map_basic_pool_error(error, MetricRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MetricRepositoryError {
    map_basic_diesel_error(
        error,
        MetricRepositoryError::query,
        MetricRepositoryError::connection,
    )
}

fn row_to_metric(row: MetricRow) -> Result<Metric, MetricRepositoryError> {
    let MetricRow {
        id,
        user_id,
        temperature,
        humidity,
        air_quality,
        recorded_at,
    } = row;

    let air_quality = air_quality
        .parse()
        .map_err(|err| MetricRepositoryError::query(format!("metric {id}: {err}")))?;
    let reading = MetricReading::new(temperature, humidity, air_quality)
        .map_err(|err| MetricRepositoryError::query(format!("metric {id}: {err}")))?;
    Ok(Metric::from_parts(
        id,
        UserId::from_uuid(user_id),
        reading,
        recorded_at,
    ))
}

#[async_trait]
impl MetricRepository for DieselMetricRepository {
    async fn insert(&self, metric: &Metric) -> Result<(), MetricRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let reading = metric.reading();
        let row = NewMetricRow {
            id: metric.id(),
            user_id: *metric.user_id().as_uuid(),
            temperature: reading.temperature(),
            humidity: reading.humidity(),
            air_quality: reading.air_quality().as_str(),
            recorded_at: metric.timestamp(),
        };

        diesel::insert_into(metrics::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn latest_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Metric>, MetricRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = metrics::table
            .filter(metrics::user_id.eq(user_id.as_uuid()))
            .order((metrics::recorded_at.desc(), metrics::id.desc()))
            .select(MetricRow::as_select())
            .first::<MetricRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_metric).transpose()
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Metric>, MetricRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| MetricRepositoryError::query("history limit out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MetricRow> = metrics::table
            .filter(metrics::user_id.eq(user_id.as_uuid()))
            .order((metrics::recorded_at.desc(), metrics::id.desc()))
            .limit(limit)
            .select(MetricRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_metric).collect()
    }
}
