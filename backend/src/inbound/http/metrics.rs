//! Metric HTTP handlers.
//!
//! ```text
//! GET  /api/metrics/latest
//! POST /api/metrics {"temperature":22.5,"humidity":48.0,"airQuality":"Good"}
//! GET  /api/metrics/history
//! ```
//!
//! Every route requires a bearer token and is scoped to its owner.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{AirQuality, Error, MetricReading, MetricValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{AirQualitySchema, ErrorSchema, MetricSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/metrics`.
///
/// Unknown fields, including any `userId`, are ignored: the record always
/// belongs to the token's owner.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetricRequest {
    pub temperature: f64,
    pub humidity: f64,
    #[schema(value_type = AirQualitySchema)]
    pub air_quality: AirQuality,
}

impl TryFrom<RecordMetricRequest> for MetricReading {
    type Error = MetricValidationError;

    fn try_from(value: RecordMetricRequest) -> Result<Self, Self::Error> {
        MetricReading::new(value.temperature, value.humidity, value.air_quality)
    }
}

/// Readings that fail validation are failed writes, reported as internal
/// errors like undecodable bodies.
fn map_reading_error(err: MetricValidationError) -> Error {
    match err {
        MetricValidationError::NonFinite { field } => Error::internal(err.to_string())
            .with_details(json!({ "field": field, "code": "non_finite" })),
    }
}

/// Newest metric recorded by the caller.
#[utoipa::path(
    get,
    path = "/api/metrics/latest",
    responses(
        (status = 200, description = "Latest metric", body = MetricSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No metrics recorded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["metrics"],
    operation_id = "getLatestMetric",
    security(("BearerToken" = []))
)]
#[get("/metrics/latest")]
pub async fn latest_metric(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let metric = state.metrics_query.latest_metric(user.user_id()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(metric))
}

/// Record a metric for the caller.
///
/// # Examples
/// ```no_run
/// use actix_web::{HttpResponse, web};
/// use ecoband::domain::AirQuality;
/// use ecoband::inbound::http::ApiResult;
/// use ecoband::inbound::http::auth::AuthenticatedUser;
/// use ecoband::inbound::http::metrics::{RecordMetricRequest, record_metric};
/// use ecoband::inbound::http::state::HttpState;
///
/// async fn call_handler(
///     state: web::Data<HttpState>,
///     user: AuthenticatedUser,
/// ) -> ApiResult<HttpResponse> {
///     let payload = web::Json(RecordMetricRequest {
///         temperature: 22.5,
///         humidity: 48.0,
///         air_quality: AirQuality::Good,
///     });
///     record_metric(state, user, payload).await
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/metrics",
    request_body = RecordMetricRequest,
    responses(
        (status = 201, description = "Metric recorded", body = MetricSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["metrics"],
    operation_id = "recordMetric",
    security(("BearerToken" = []))
)]
#[post("/metrics")]
pub async fn record_metric(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecordMetricRequest>,
) -> ApiResult<HttpResponse> {
    let reading = MetricReading::try_from(payload.into_inner()).map_err(map_reading_error)?;
    let metric = state.metrics.record_metric(user.user_id(), reading).await?;
    Ok(HttpResponse::Created().json(metric))
}

/// Up to ten of the caller's newest metrics, newest first.
#[utoipa::path(
    get,
    path = "/api/metrics/history",
    responses(
        (status = 200, description = "Metric history", body = [MetricSchema]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["metrics"],
    operation_id = "getMetricHistory",
    security(("BearerToken" = []))
)]
#[get("/metrics/history")]
pub async fn metric_history(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let history = state.metrics_query.metric_history(user.user_id()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(history))
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
