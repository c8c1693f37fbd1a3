//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their serde shape and exist only for documentation.

#![expect(
    dead_code,
    reason = "schema wrappers are only read by utoipa's derive output"
)]

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Bearer token missing, malformed or expired.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "not_found")]
    NotFound,
    /// The telemetry vendor is unreachable or refused the request.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error response payload.
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "unauthorized")]
    code: ErrorCodeSchema,
    #[schema(example = "missing bearer token")]
    message: String,
    /// Same value as the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Categorical air-quality rating.
#[derive(ToSchema)]
#[schema(as = AirQuality)]
pub enum AirQualitySchema {
    Good,
    Moderate,
    Poor,
}

/// A persisted metric owned by the caller.
#[derive(ToSchema)]
#[schema(as = Metric)]
#[schema(rename_all = "camelCase")]
pub struct MetricSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    user_id: String,
    #[schema(example = 22.5)]
    temperature: f64,
    #[schema(example = 48.0)]
    humidity: f64,
    air_quality: AirQualitySchema,
    #[schema(format = "date-time")]
    timestamp: String,
}

/// Buzzer state decoded from the vendor's `field4`.
#[derive(ToSchema)]
#[schema(as = BuzzerState)]
pub enum BuzzerStateSchema {
    #[schema(rename = "on")]
    On,
    #[schema(rename = "off")]
    Off,
}

/// One vendor feed entry with its derived green score.
///
/// Sensor values are `null` when the vendor field is absent or not a number.
#[derive(ToSchema)]
#[schema(as = TelemetrySnapshot)]
#[schema(rename_all = "camelCase")]
pub struct TelemetrySnapshotSchema {
    #[schema(example = 1042)]
    entry_id: Option<u64>,
    #[schema(format = "date-time")]
    recorded_at: Option<String>,
    #[schema(example = 35.0)]
    air_quality: Option<f64>,
    #[schema(example = 23.1)]
    temperature: Option<f64>,
    #[schema(example = 51.0)]
    humidity: Option<f64>,
    buzzer: BuzzerStateSchema,
    #[schema(minimum = 0, maximum = 100, example = 86)]
    green_score: u8,
}

/// Response to `POST /api/telemetry/buzzer`.
#[derive(ToSchema)]
#[schema(as = BuzzerActivation)]
#[schema(rename_all = "camelCase")]
pub struct BuzzerActivationSchema {
    buzzer: BuzzerStateSchema,
    #[schema(example = 16)]
    resets_after_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("not_found")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_every_code(#[case] code: &str) {
        assert!(schema_to_json::<ErrorCodeSchema>().contains(code));
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(!json.contains("trace_id"));
    }

    #[test]
    fn metric_schema_matches_json_shape() {
        assert_eq!(MetricSchema::name(), "Metric");
        let json = schema_to_json::<MetricSchema>();
        for field in ["id", "userId", "temperature", "humidity", "airQuality", "timestamp"] {
            assert!(json.contains(&format!("\"{field}\"")), "missing {field}");
        }
    }

    #[test]
    fn snapshot_schema_exposes_green_score() {
        let json = schema_to_json::<TelemetrySnapshotSchema>();
        assert!(json.contains("greenScore"));
        assert!(json.contains("entryId"));
    }
}
