//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod auth_config;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod metrics;
pub mod schemas;
pub mod state;
pub mod telemetry;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Scope mounting every authenticated route under `/api`.
///
/// Malformed JSON bodies and query strings are reported as
/// `invalid_request` rather than actix's plain-text defaults.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(metrics::latest_metric)
        .service(metrics::record_metric)
        .service(metrics::metric_history)
        .service(telemetry::latest_telemetry)
        .service(telemetry::telemetry_history)
        .service(telemetry::find_band)
}
