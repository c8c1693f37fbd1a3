//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`MetricsCommand`, `MetricsQuery`, `TelemetryQuery`,
//! `BuzzerCommand`) are what inbound adapters call. Driven ports
//! (`MetricRepository`, `TelemetrySource`, `AccessTokenVerifier`) are what
//! the domain needs from outbound adapters; each exposes a typed error so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token;
mod buzzer_command;
mod metric_repository;
mod metrics_command;
mod metrics_query;
mod telemetry_query;
mod telemetry_source;

pub use access_token::AccessTokenVerifier;
#[cfg(test)]
pub use access_token::MockAccessTokenVerifier;
pub use buzzer_command::{BuzzerActivation, BuzzerCommand};
#[cfg(test)]
pub use buzzer_command::MockBuzzerCommand;
#[cfg(test)]
pub use metric_repository::MockMetricRepository;
pub use metric_repository::{FixtureMetricRepository, MetricRepository, MetricRepositoryError};
#[cfg(test)]
pub use metrics_command::MockMetricsCommand;
pub use metrics_command::{FixtureMetricsCommand, MetricsCommand};
#[cfg(test)]
pub use metrics_query::MockMetricsQuery;
pub use metrics_query::{FixtureMetricsQuery, MetricsQuery};
#[cfg(test)]
pub use telemetry_query::MockTelemetryQuery;
pub use telemetry_query::TelemetryQuery;
#[cfg(test)]
pub use telemetry_source::MockTelemetrySource;
pub use telemetry_source::{FixtureTelemetrySource, TelemetrySource, TelemetrySourceError};
