//! Driving port for recording metrics.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, Metric, MetricReading, UserId};

/// Domain use-case port for appending a metric to the caller's history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsCommand: Send + Sync {
    /// Record a reading for `user_id`, timestamped now.
    async fn record_metric(&self, user_id: &UserId, reading: MetricReading)
    -> Result<Metric, Error>;
}

/// Fixture command that echoes the reading back without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMetricsCommand;

#[async_trait]
impl MetricsCommand for FixtureMetricsCommand {
    async fn record_metric(
        &self,
        user_id: &UserId,
        reading: MetricReading,
    ) -> Result<Metric, Error> {
        Ok(Metric::record(user_id.clone(), reading, Utc::now()))
    }
}
