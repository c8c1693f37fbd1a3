//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, BuzzerCommand, MetricsCommand, MetricsQuery, TelemetryQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub metrics: Arc<dyn MetricsCommand>,
    pub metrics_query: Arc<dyn MetricsQuery>,
    pub telemetry: Arc<dyn TelemetryQuery>,
    pub buzzer: Arc<dyn BuzzerCommand>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
}

impl HttpState {
    /// Build state from services that implement both halves of their port
    /// pairs.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ecoband::domain::ports::{FixtureMetricRepository, FixtureTelemetrySource};
    /// use ecoband::domain::{MetricsService, TelemetryService};
    /// use ecoband::inbound::http::state::HttpState;
    /// use ecoband::outbound::token::JwtAccessTokens;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(MetricsService::new(
    ///         Arc::new(FixtureMetricRepository),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     Arc::new(TelemetryService::new(Arc::new(FixtureTelemetrySource))),
    ///     Arc::new(JwtAccessTokens::new(b"0123456789abcdef0123456789abcdef")),
    /// );
    /// let _query = state.metrics_query.clone();
    /// ```
    pub fn new<M, T>(
        metrics: Arc<M>,
        telemetry: Arc<T>,
        tokens: Arc<dyn AccessTokenVerifier>,
    ) -> Self
    where
        M: MetricsCommand + MetricsQuery + 'static,
        T: TelemetryQuery + BuzzerCommand + 'static,
    {
        Self {
            metrics: metrics.clone(),
            metrics_query: metrics,
            telemetry: telemetry.clone(),
            buzzer: telemetry,
            tokens,
        }
    }
}
