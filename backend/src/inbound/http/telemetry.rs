//! Telemetry proxy HTTP handlers.
//!
//! ```text
//! GET  /api/telemetry/latest
//! GET  /api/telemetry/history?days=7
//! POST /api/telemetry/buzzer
//! ```
//!
//! Vendor credentials stay on the server; clients only see scored readings.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{Error, FeedWindow, FeedWindowError, MAX_FEED_DAYS};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{BuzzerActivationSchema, ErrorSchema, TelemetrySnapshotSchema};
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/telemetry/history`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Look-back window in days, `1..=31`; defaults to 7.
    #[param(minimum = 1, maximum = 31, example = 7)]
    pub days: Option<u32>,
}

impl HistoryQuery {
    fn window(&self) -> Result<FeedWindow, Error> {
        self.days
            .map_or(Ok(FeedWindow::default()), FeedWindow::new)
            .map_err(|err| match err {
                FeedWindowError::OutOfRange { days } => Error::invalid_request(err.to_string())
                    .with_details(json!({
                        "field": "days",
                        "value": days,
                        "max": MAX_FEED_DAYS,
                        "code": "days_out_of_range",
                    })),
            })
    }
}

/// Latest vendor entry with its green score.
#[utoipa::path(
    get,
    path = "/api/telemetry/latest",
    responses(
        (status = 200, description = "Latest telemetry", body = TelemetrySnapshotSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Channel has no entries", body = ErrorSchema),
        (status = 500, description = "Undecodable vendor payload", body = ErrorSchema),
        (status = 503, description = "Vendor unavailable", body = ErrorSchema)
    ),
    tags = ["telemetry"],
    operation_id = "getLatestTelemetry",
    security(("BearerToken" = []))
)]
#[get("/telemetry/latest")]
pub async fn latest_telemetry(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let snapshot = state.telemetry.latest_snapshot().await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(snapshot))
}

/// Vendor feed for the requested window, oldest first.
#[utoipa::path(
    get,
    path = "/api/telemetry/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Telemetry history", body = [TelemetrySnapshotSchema]),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 500, description = "Undecodable vendor payload", body = ErrorSchema),
        (status = 503, description = "Vendor unavailable", body = ErrorSchema)
    ),
    tags = ["telemetry"],
    operation_id = "getTelemetryHistory",
    security(("BearerToken" = []))
)]
#[get("/telemetry/history")]
pub async fn telemetry_history(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let history = state.telemetry.snapshot_history(window).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(history))
}

/// Sound the band's buzzer; it switches itself off after a short delay.
#[utoipa::path(
    post,
    path = "/api/telemetry/buzzer",
    responses(
        (status = 202, description = "Buzzer switched on", body = BuzzerActivationSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Vendor refused or unavailable", body = ErrorSchema)
    ),
    tags = ["telemetry"],
    operation_id = "findBand",
    security(("BearerToken" = []))
)]
#[post("/telemetry/buzzer")]
pub async fn find_band(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    tracing::info!(user_id = %user.user_id(), "find band requested");
    let activation = state.buzzer.find_band().await?;
    Ok(HttpResponse::Accepted().json(activation))
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
