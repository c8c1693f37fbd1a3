//! Driven port for the band's vendor telemetry channel.
//!
//! The domain owns the reading shape; adapters translate the vendor's
//! string-typed feed into [`TelemetryReading`] values and its write endpoint
//! into buzzer updates.

use async_trait::async_trait;

use crate::domain::{BuzzerState, FeedWindow, TelemetryReading};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the telemetry vendor.
    pub enum TelemetrySourceError {
        /// Network transport failed or timed out before a response arrived.
        Transport { message: String } =>
            "telemetry transport failed: {message}",
        /// The vendor answered with a non-success status.
        Status { status: u16 } =>
            "telemetry vendor returned status {status}",
        /// The vendor response could not be decoded.
        Decode { message: String } =>
            "telemetry response decode failed: {message}",
        /// The vendor refused a channel update.
        Rejected { message: String } =>
            "telemetry update rejected: {message}",
        /// The adapter lacks the credentials needed for this call.
        NotConfigured { message: String } =>
            "telemetry source not configured: {message}",
    }
}

/// Port for reading the vendor feed and writing the buzzer field.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Latest feed entry; `None` when the channel holds no entries.
    async fn latest_reading(&self) -> Result<Option<TelemetryReading>, TelemetrySourceError>;

    /// Feed entries recorded within `window`, oldest first.
    async fn feed(&self, window: FeedWindow)
    -> Result<Vec<TelemetryReading>, TelemetrySourceError>;

    /// Write the buzzer field, returning the vendor's new entry id.
    async fn set_buzzer(&self, state: BuzzerState) -> Result<u64, TelemetrySourceError>;
}

/// Fixture source with an empty channel and no write access.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTelemetrySource;

#[async_trait]
impl TelemetrySource for FixtureTelemetrySource {
    async fn latest_reading(&self) -> Result<Option<TelemetryReading>, TelemetrySourceError> {
        Ok(None)
    }

    async fn feed(
        &self,
        _window: FeedWindow,
    ) -> Result<Vec<TelemetryReading>, TelemetrySourceError> {
        Ok(Vec::new())
    }

    async fn set_buzzer(&self, _state: BuzzerState) -> Result<u64, TelemetrySourceError> {
        Err(TelemetrySourceError::not_configured(
            "no telemetry channel configured",
        ))
    }
}
