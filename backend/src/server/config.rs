//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ecoband::domain::DEFAULT_BUZZER_RESET;
use ecoband::domain::ports::AccessTokenVerifier;
use ecoband::outbound::persistence::DbPool;
use ecoband::outbound::thingspeak::{DEFAULT_THINGSPEAK_TIMEOUT, ThingSpeakChannel};

/// Vendor channel plus its request timeout.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub(crate) channel: ThingSpeakChannel,
    pub(crate) timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<dyn AccessTokenVerifier>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) telemetry: Option<TelemetryConfig>,
    pub(crate) buzzer_reset: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<dyn AccessTokenVerifier>) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            telemetry: None,
            buzzer_reset: DEFAULT_BUZZER_RESET,
        }
    }

    /// Persist metrics in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Proxy telemetry to a ThingSpeak channel.
    ///
    /// Without a channel the telemetry routes see an empty feed and the
    /// buzzer answers `503`.
    #[must_use]
    pub fn with_thingspeak(mut self, channel: ThingSpeakChannel, timeout: Option<Duration>) -> Self {
        self.telemetry = Some(TelemetryConfig {
            channel,
            timeout: timeout.unwrap_or(DEFAULT_THINGSPEAK_TIMEOUT),
        });
        self
    }

    #[must_use]
    pub fn with_buzzer_reset(mut self, delay: Duration) -> Self {
        self.buzzer_reset = delay;
        self
    }

    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "read by integration tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
