//! Builders wiring adapters into the HTTP state.
//!
//! Each port pair falls back to an in-process implementation when its
//! infrastructure is not configured, so the server always starts.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use ecoband::domain::ports::{
    BuzzerCommand, FixtureTelemetrySource, MetricRepository, MetricsCommand, MetricsQuery,
    TelemetryQuery, TelemetrySource,
};
use ecoband::domain::{MetricsService, TelemetryService};
use ecoband::inbound::http::state::HttpState;
use ecoband::outbound::memory::InMemoryMetricRepository;
use ecoband::outbound::persistence::DieselMetricRepository;
use ecoband::outbound::thingspeak::ThingSpeakHttpSource;

use super::ServerConfig;

type MetricPorts = (Arc<dyn MetricsCommand>, Arc<dyn MetricsQuery>);
type TelemetryPorts = (Arc<dyn TelemetryQuery>, Arc<dyn BuzzerCommand>);

fn metric_ports<R>(repo: R) -> MetricPorts
where
    R: MetricRepository + 'static,
{
    let service = Arc::new(MetricsService::new(Arc::new(repo), Arc::new(DefaultClock)));
    (service.clone(), service)
}

fn telemetry_ports<S>(source: S, config: &ServerConfig) -> TelemetryPorts
where
    S: TelemetrySource + 'static,
{
    let service = Arc::new(TelemetryService::with_buzzer_reset(
        Arc::new(source),
        config.buzzer_reset,
    ));
    (service.clone(), service)
}

fn build_metric_ports(config: &ServerConfig) -> MetricPorts {
    match &config.db_pool {
        Some(pool) => metric_ports(DieselMetricRepository::new(pool.clone())),
        None => {
            info!("no database configured; metrics are kept in memory");
            metric_ports(InMemoryMetricRepository::new())
        }
    }
}

fn build_telemetry_ports(config: &ServerConfig) -> std::io::Result<TelemetryPorts> {
    match &config.telemetry {
        Some(telemetry) => {
            let source = ThingSpeakHttpSource::new(telemetry.channel.clone(), telemetry.timeout)
                .map_err(|err| {
                    std::io::Error::other(format!("failed to build ThingSpeak client: {err}"))
                })?;
            info!(
                channel_id = %telemetry.channel.channel_id,
                buzzer = telemetry.channel.write_key.is_some(),
                "telemetry proxied to ThingSpeak"
            );
            Ok(telemetry_ports(source, config))
        }
        None => {
            info!("no ThingSpeak channel configured; telemetry routes serve an empty feed");
            Ok(telemetry_ports(FixtureTelemetrySource, config))
        }
    }
}

/// Assemble the HTTP state from configured adapters.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the ThingSpeak client cannot be built.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let (metrics, metrics_query) = build_metric_ports(config);
    let (telemetry, buzzer) = build_telemetry_ports(config)?;
    Ok(web::Data::new(HttpState {
        metrics,
        metrics_query,
        telemetry,
        buzzer,
        tokens: config.tokens.clone(),
    }))
}
