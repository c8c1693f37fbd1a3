//! Port for metric persistence.
//!
//! Metrics are append-only, so the repository exposes a single insert and
//! two read paths. Every read is ordered newest first with the metric id
//! breaking timestamp ties.

use async_trait::async_trait;

use crate::domain::{Metric, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by metric repository adapters.
    pub enum MetricRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "metric repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "metric repository query failed: {message}",
    }
}

/// Port for storing and reading per-user metrics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Persist one metric. No deduplication is performed.
    async fn insert(&self, metric: &Metric) -> Result<(), MetricRepositoryError>;

    /// Fetch the newest metric owned by `user_id`, if any.
    async fn latest_for_user(&self, user_id: &UserId)
    -> Result<Option<Metric>, MetricRepositoryError>;

    /// Fetch up to `limit` of the newest metrics owned by `user_id`.
    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Metric>, MetricRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMetricRepository;

#[async_trait]
impl MetricRepository for FixtureMetricRepository {
    async fn insert(&self, _metric: &Metric) -> Result<(), MetricRepositoryError> {
        Ok(())
    }

    async fn latest_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Metric>, MetricRepositoryError> {
        Ok(None)
    }

    async fn recent_for_user(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<Metric>, MetricRepositoryError> {
        Ok(Vec::new())
    }
}
