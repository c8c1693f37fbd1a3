//! Mutex-guarded in-memory `MetricRepository`.
//!
//! Holds every metric for the lifetime of the process. Reads apply the same
//! `timestamp DESC, id DESC` ordering as the PostgreSQL adapter.

use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{MetricRepository, MetricRepositoryError};
use crate::domain::{Metric, UserId};

/// Process-local metric store.
#[derive(Debug, Default)]
pub struct InMemoryMetricRepository {
    metrics: Mutex<Vec<Metric>>,
}

impl InMemoryMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Metric>>, MetricRepositoryError> {
        self.metrics
            .lock()
            .map_err(|_| MetricRepositoryError::connection("metric store lock poisoned"))
    }

    fn newest_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Metric>, MetricRepositoryError> {
        let guard = self.lock()?;
        let mut owned: Vec<Metric> = guard
            .iter()
            .filter(|metric| metric.user_id() == user_id)
            .cloned()
            .collect();
        drop(guard);
        owned.sort_by_key(|metric| Reverse(metric.recency_key()));
        owned.truncate(limit);
        Ok(owned)
    }
}

#[async_trait]
impl MetricRepository for InMemoryMetricRepository {
    async fn insert(&self, metric: &Metric) -> Result<(), MetricRepositoryError> {
        self.lock()?.push(metric.clone());
        Ok(())
    }

    async fn latest_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Metric>, MetricRepositoryError> {
        Ok(self.newest_for_user(user_id, 1)?.into_iter().next())
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Metric>, MetricRepositoryError> {
        self.newest_for_user(user_id, limit)
    }
}
