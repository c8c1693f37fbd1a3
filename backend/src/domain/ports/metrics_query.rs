//! Driving port for metric reads.
//!
//! Inbound adapters use this port to read the caller's metrics without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Metric, UserId};

/// Domain use-case port for reading the caller's metrics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsQuery: Send + Sync {
    /// Newest metric for `user_id`; a `not_found` error when there is none.
    async fn latest_metric(&self, user_id: &UserId) -> Result<Metric, Error>;

    /// Up to ten newest metrics for `user_id`, newest first.
    async fn metric_history(&self, user_id: &UserId) -> Result<Vec<Metric>, Error>;
}

/// Fixture query for a user with no stored metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMetricsQuery;

#[async_trait]
impl MetricsQuery for FixtureMetricsQuery {
    async fn latest_metric(&self, _user_id: &UserId) -> Result<Metric, Error> {
        Err(Error::not_found("no metrics found"))
    }

    async fn metric_history(&self, _user_id: &UserId) -> Result<Vec<Metric>, Error> {
        Ok(Vec::new())
    }
}
