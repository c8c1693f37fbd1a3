//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities shared by the HTTP API, the
//! persistence adapters and the dashboard client, plus the services that
//! implement the driving ports. Types are immutable once built and document
//! their serde contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - UserId: identity carried by a verified bearer token.
//! - Metric / MetricReading / AirQuality: persisted sensor snapshots.
//! - GreenScore: derived 0–100 score.
//! - TelemetryReading / TelemetrySnapshot: live vendor feed entries.
//! - MetricsService / TelemetryService: driving port implementations.

pub mod error;
mod green_score;
mod metric;
mod metrics_service;
pub mod ports;
mod telemetry;
mod telemetry_service;
pub mod trace_id;
mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::green_score::{GreenScore, ScoreInputs};
pub use self::metric::{
    AirQuality, METRIC_HISTORY_LIMIT, Metric, MetricReading, MetricValidationError,
    ParseAirQualityError,
};
pub use self::metrics_service::MetricsService;
pub use self::telemetry::{
    BuzzerState, DEFAULT_FEED_DAYS, FeedWindow, FeedWindowError, MAX_FEED_DAYS, TelemetryReading,
    TelemetrySnapshot, parse_sensor_field,
};
pub use self::telemetry_service::{DEFAULT_BUZZER_RESET, TelemetryService};
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ecoband::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("missing bearer token"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
