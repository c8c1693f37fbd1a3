//! Metric domain service.
//!
//! Implements the metric driving ports over a [`MetricRepository`]. The
//! record path always stamps the metric with the service clock and the
//! authenticated identity handed in by the inbound adapter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{MetricRepository, MetricRepositoryError, MetricsCommand, MetricsQuery};
use crate::domain::{Error, METRIC_HISTORY_LIMIT, Metric, MetricReading, UserId};

/// Storage faults of either kind surface as internal errors; the detail is
/// logged here and redacted at the HTTP boundary.
fn map_repository_error(error: MetricRepositoryError) -> Error {
    error!(error = %error, "metric repository call failed");
    match error {
        MetricRepositoryError::Connection { message } => {
            Error::internal(format!("metric repository unavailable: {message}"))
        }
        MetricRepositoryError::Query { message } => {
            Error::internal(format!("metric repository error: {message}"))
        }
    }
}

/// Metric service implementing [`MetricsCommand`] and [`MetricsQuery`].
#[derive(Clone)]
pub struct MetricsService<R> {
    metric_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MetricsService<R> {
    /// Create a new service with the metric repository and clock.
    pub fn new(metric_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { metric_repo, clock }
    }
}

#[async_trait]
impl<R> MetricsCommand for MetricsService<R>
where
    R: MetricRepository,
{
    async fn record_metric(
        &self,
        user_id: &UserId,
        reading: MetricReading,
    ) -> Result<Metric, Error> {
        let metric = Metric::record(user_id.clone(), reading, self.clock.utc());
        self.metric_repo
            .insert(&metric)
            .await
            .map_err(map_repository_error)?;

        info!(
            user_id = %user_id,
            metric_id = %metric.id(),
            air_quality = %reading.air_quality(),
            "metric recorded"
        );
        Ok(metric)
    }
}

#[async_trait]
impl<R> MetricsQuery for MetricsService<R>
where
    R: MetricRepository,
{
    async fn latest_metric(&self, user_id: &UserId) -> Result<Metric, Error> {
        self.metric_repo
            .latest_for_user(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("no metrics found"))
    }

    async fn metric_history(&self, user_id: &UserId) -> Result<Vec<Metric>, Error> {
        self.metric_repo
            .recent_for_user(user_id, METRIC_HISTORY_LIMIT)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "metrics_service_tests.rs"]
mod tests;
