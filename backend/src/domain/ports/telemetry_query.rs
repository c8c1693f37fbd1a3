//! Driving port for live telemetry reads.

use async_trait::async_trait;

use crate::domain::{Error, FeedWindow, TelemetrySnapshot};

/// Domain use-case port for reading scored vendor telemetry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryQuery: Send + Sync {
    /// Latest vendor entry with its score; `not_found` on an empty channel.
    async fn latest_snapshot(&self) -> Result<TelemetrySnapshot, Error>;

    /// Vendor entries within `window`, oldest first, each scored.
    async fn snapshot_history(&self, window: FeedWindow) -> Result<Vec<TelemetrySnapshot>, Error>;
}
