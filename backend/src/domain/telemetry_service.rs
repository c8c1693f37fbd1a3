//! Telemetry domain service.
//!
//! Wraps a [`TelemetrySource`] to serve scored vendor readings and to drive
//! the buzzer. Activating the buzzer writes `on` synchronously and hands the
//! matching `off` write to a background task once the reset delay elapses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    BuzzerActivation, BuzzerCommand, TelemetryQuery, TelemetrySource, TelemetrySourceError,
};
use crate::domain::{BuzzerState, Error, FeedWindow, TelemetrySnapshot, TraceId};

/// Delay before an activated buzzer is switched off again.
///
/// The vendor accepts at most one channel update every 15 seconds.
pub const DEFAULT_BUZZER_RESET: Duration = Duration::from_secs(16);

fn map_source_error(error: TelemetrySourceError) -> Error {
    match error {
        TelemetrySourceError::Transport { .. }
        | TelemetrySourceError::Status { .. }
        | TelemetrySourceError::Rejected { .. }
        | TelemetrySourceError::NotConfigured { .. } => {
            warn!(error = %error, "telemetry vendor unavailable");
            Error::service_unavailable(error.to_string())
        }
        TelemetrySourceError::Decode { .. } => {
            error!(error = %error, "telemetry vendor payload undecodable");
            Error::internal(error.to_string())
        }
    }
}

/// Telemetry service implementing [`TelemetryQuery`] and [`BuzzerCommand`].
pub struct TelemetryService<S> {
    source: Arc<S>,
    buzzer_reset: Duration,
}

impl<S> Clone for TelemetryService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            buzzer_reset: self.buzzer_reset,
        }
    }
}

impl<S> TelemetryService<S> {
    /// Create a service with the default buzzer reset delay.
    pub fn new(source: Arc<S>) -> Self {
        Self::with_buzzer_reset(source, DEFAULT_BUZZER_RESET)
    }

    pub fn with_buzzer_reset(source: Arc<S>, buzzer_reset: Duration) -> Self {
        Self {
            source,
            buzzer_reset,
        }
    }
}

#[async_trait]
impl<S> TelemetryQuery for TelemetryService<S>
where
    S: TelemetrySource,
{
    async fn latest_snapshot(&self) -> Result<TelemetrySnapshot, Error> {
        self.source
            .latest_reading()
            .await
            .map_err(map_source_error)?
            .map(TelemetrySnapshot::from)
            .ok_or_else(|| Error::not_found("telemetry channel has no entries"))
    }

    async fn snapshot_history(&self, window: FeedWindow) -> Result<Vec<TelemetrySnapshot>, Error> {
        let readings = self.source.feed(window).await.map_err(map_source_error)?;
        Ok(readings.into_iter().map(TelemetrySnapshot::from).collect())
    }
}

#[async_trait]
impl<S> BuzzerCommand for TelemetryService<S>
where
    S: TelemetrySource + 'static,
{
    async fn find_band(&self) -> Result<BuzzerActivation, Error> {
        let entry_id = self
            .source
            .set_buzzer(BuzzerState::On)
            .await
            .map_err(map_source_error)?;
        info!(entry_id, reset_after_secs = self.buzzer_reset.as_secs(), "buzzer switched on");

        let source = Arc::clone(&self.source);
        let delay = self.buzzer_reset;
        let reset = async move {
            tokio::time::sleep(delay).await;
            match source.set_buzzer(BuzzerState::Off).await {
                Ok(entry_id) => info!(entry_id, "buzzer switched off"),
                Err(err) => error!(error = %err, "buzzer reset failed"),
            }
        };
        TraceId::spawn_in_scope(reset);

        Ok(BuzzerActivation::on_for(delay))
    }
}
